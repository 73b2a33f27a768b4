pub mod currency;
pub mod donation;
pub mod outreach;

pub use currency::{builtin_catalog, Currency, Network};
pub use donation::{CreateDonationRequest, Donation};
pub use outreach::{ContactedEmail, EmailContext, SendEmailRequest, SendOutcome, SendStatus};
