pub mod groq_client;
pub mod groq_client_error;
pub mod quiz_api_client;
