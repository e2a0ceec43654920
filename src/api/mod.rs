mod error;
mod handler;
mod messages;
mod router;

pub use error::{ApiContext, ApiErrorCode, ApiRejection, recover_error};
pub use handler::{ApiResponse, UserView};
pub use messages::{Locale, Messages};
pub use router::{BoxedReply, app, routes};
