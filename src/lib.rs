//! Password policy validation library
//!
//! This library checks candidate passwords against a configurable policy
//! of composition, history, dictionary and pattern rules, and reports every
//! violated rule.
//!
//! # Features
//!
//! - `async` (default): Enables delivering validation outcomes over a channel
//! - `tracing`: Enables logging via tracing crate
//! - `http`: Enables the `reqwest` transport for the external rule service
//!
//! # Environment Variables
//!
//! - `PWD_WORDLIST_PATH`: Custom path to the wordlist file
//!   (default: `./assets/wordlist.txt`)
//! - `PWD_RULE_SERVICE_URL`: Endpoint of the external rule service
//! - `PWD_RULE_HALT_ON_ERROR`: `true` to raise rule service failures as halts
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_policy::{PasswordRuleValidator, Policy, Rule, Services, Wordlist};
//! use secrecy::SecretString;
//!
//! let policy = Policy::builder()
//!     .set(Rule::MinimumLength, 10)
//!     .set(Rule::MinimumNumeric, 1)
//!     .build()
//!     .expect("Invalid policy");
//!
//! // Load the wordlist (call once at startup)
//! let wordlist = Wordlist::new();
//! wordlist.load().expect("Failed to load wordlist");
//!
//! let services = Services {
//!     wordlist: Some(&wordlist),
//!     ..Default::default()
//! };
//! let validator = PasswordRuleValidator::new(&policy, services);
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! match validator.test_password(Some(&password), None, None, None) {
//!     Ok(()) => println!("Password accepted"),
//!     Err(e) => println!("Password rejected: {}", e),
//! }
//! ```

// Re-export types from pwd-types for convenience
pub use pwd_types::{PasswordEvaluation, PasswordScore, PasswordStrength};

// Internal modules
mod counter;
mod directory;
mod error;
mod external;
mod history;
#[cfg(feature = "http")]
mod http;
mod macros;
mod policy;
mod sections;
mod services;
mod strength;
mod user;
mod validator;
mod violation;
mod wordlist;

// Public API
pub use counter::CharCounter;
pub use directory::{DirectoryError, DirectoryErrorCode, DirectoryPolicy};
pub use error::{PolicyError, RuleServiceError, ValidationError};
pub use external::{ExternalRuleInvoker, RuleServiceSettings, RuleTransport};
pub use history::DefaultAttributeMatcher;
pub use macros::UserMacroExpander;
pub use policy::{
    AdComplexity, DisallowedAttribute, Policy, PolicyBuilder, Rule, RuleHelper, RuleType,
    RuleValue,
};
pub use sections::basic_syntax_checks;
pub use services::{
    AttributeMatcher, MacroExpander, ServiceStatus, Statistic, Statistics, StatisticsCounter,
    StrengthJudge, WordlistService,
};
pub use strength::{StrengthMeter, evaluate_password_strength};
pub use user::{PublicUserInfo, UserContext, UserIdentity};
pub use validator::{Flag, PasswordRuleValidator, Services};
pub use violation::{Violation, ViolationKind};
pub use wordlist::{Wordlist, WordlistError, wordlist_path};

#[cfg(feature = "http")]
pub use http::HttpRuleTransport;
