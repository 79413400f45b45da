pub mod ocr_client;
pub mod portal_client;

pub use ocr_client::{TencentOcrClient, TextRecognizer};
pub use portal_client::PortalClient;
