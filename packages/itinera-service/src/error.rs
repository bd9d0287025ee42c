pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Vector dimension mismatch: {left} != {right}.")]
	DimensionMismatch { left: usize, right: usize },
	#[error("Backend unavailable: {message}")]
	BackendUnavailable { message: String },
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
}
impl From<itinera_domain::Error> for Error {
	fn from(err: itinera_domain::Error) -> Self {
		use itinera_domain::Error as DomainError;

		match err {
			DomainError::DimensionMismatch { left, right } => Self::DimensionMismatch { left, right },
			DomainError::InvalidQuery { message } => Self::InvalidQuery { message },
			DomainError::InvalidConfig { message } => Self::InvalidConfig { message },
		}
	}
}

impl From<itinera_providers::Error> for Error {
	fn from(err: itinera_providers::Error) -> Self {
		Self::BackendUnavailable { message: err.to_string() }
	}
}
