pub mod interface;
pub mod error;
pub mod detection;
pub mod gateway;
pub mod google;

pub use interface::{RawTranslation, TranslationRequest, TranslationResponse, Translator};
pub use error::{TranslationError, ValidationError};
pub use detection::DetectedLanguage;
pub use gateway::TranslationGateway;
pub use google::GoogleTranslator;
