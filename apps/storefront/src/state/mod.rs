//! # State Module
//!
//! View-local state helpers. Nothing here is shared between views; each
//! view constructs its own.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │   ViewState<T>   │ │   NoticeSlot     │ │   FetchSequence      │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  Arc<Mutex<T>>   │ │  one banner,     │ │  generation counter  │   │
//! │  │  with / with_mut │ │  self-expiring   │ │  last issued wins    │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod fetch_seq;
mod notice;
mod view_state;

pub use fetch_seq::{FetchSequence, Generation};
pub use notice::{Notice, NoticeKind, NoticeSlot};
pub use view_state::ViewState;
