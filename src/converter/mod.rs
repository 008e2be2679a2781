//! Output format emitters.

mod clash;
mod dns;

pub use clash::{ProviderPayload, RuleProviderEmitter};
pub use dns::DnsRejectionEmitter;
