// Mail delivery: trait-based so the transport can be swapped.
//
// GmailSender talks to the Gmail REST API with OAuth credentials;
// SmtpSender uses a password-authenticated relay.

pub mod gmail;
pub mod smtp;
pub mod traits;

pub use gmail::GmailSender;
pub use smtp::SmtpSender;
pub use traits::{build_message, MailSender, OutgoingMail, SendReceipt};
