mod comment;
pub use comment::{Comment, UNKNOWN_USER};

mod forest;
pub use forest::build_forest;

mod notify;
pub use notify::{LogNotifier, Notification, Notifier, Severity};

mod thread;
pub use thread::Thread;

mod feed;
pub use feed::run_refresh_feed;

mod http;
pub use http::HttpStore;

pub mod api {
    pub use backchat_api::*;
}
