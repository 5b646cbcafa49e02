//! Client modules for the HyperSender WhatsApp API

pub mod error_classifier;
pub mod whatsapp_client;

pub use error_classifier::classify_error_response;
pub use whatsapp_client::WhatsappClient;
