use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

// Viewer page: one <img data-url="..."> per page, in reading order.
selector!(IMAGE_LIST_SELECTOR, "#_imageList");
selector!(IMAGE_SELECTOR, "img");

selector!(SERIES_TITLE_SELECTOR, "h1.subj");
selector!(EPISODE_TITLE_SELECTOR, "h1.subj_episode");
selector!(OG_TITLE_SELECTOR, r#"meta[property="og:title"]"#);

// List page: newest episodes first, each carrying its episode number.
selector!(EPISODE_ITEM_SELECTOR, "#_listUl li[data-episode-no]");
