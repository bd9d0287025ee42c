pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("Vector dimension mismatch: {left} != {right}.")]
	DimensionMismatch { left: usize, right: usize },
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
}
impl From<itinera_config::Error> for Error {
	fn from(err: itinera_config::Error) -> Self {
		Self::InvalidConfig { message: err.to_string() }
	}
}
