use futures::{channel::oneshot, select, FutureExt, Stream, StreamExt};

use crate::{
    api::{FeedMessage, Store},
    Notifier, Thread,
};

/// Drives a [`Thread`] from a change feed scoped to its subject.
///
/// Every change signal triggers a full reload; payloads are never inspected
/// beyond the pong/changed distinction. Returns when the feed ends or when
/// the receiving half of `cancel` is dropped. Reconnection of a dropped feed
/// is the transport's concern, not ours.
pub async fn run_refresh_feed<S: Store, N: Notifier>(
    thread: &mut Thread<S, N>,
    feed: impl Stream<Item = FeedMessage> + Unpin,
    mut cancel: oneshot::Sender<()>,
) {
    let mut feed = feed.fuse();
    let mut cancellation = cancel.cancellation().fuse();
    loop {
        select! {
            _ = cancellation => {
                tracing::info!(subject = ?thread.subject(), "unsubscribed from change feed");
                return;
            }
            msg = feed.next() => match msg {
                None => {
                    tracing::warn!(subject = ?thread.subject(), "change feed closed by transport");
                    return;
                }
                Some(FeedMessage::Pong) => (),
                Some(FeedMessage::Changed(_)) => {
                    // A failed reload already surfaced a notification; the
                    // next change signal retries anyway.
                    let _ = thread.load().await;
                }
            },
        }
    }
}
