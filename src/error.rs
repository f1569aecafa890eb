use thiserror::Error;

pub type Result<T> = std::result::Result<T, GtallyError>;

#[derive(Error, Debug)]
pub enum GtallyError {
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Signature date error: {0}")]
    SignatureDate(#[from] Box<gix::date::parse::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("API error: {0}")]
    Api(#[from] Box<ureq::Error>),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for GtallyError {
    fn from(err: gix::discover::Error) -> Self {
        GtallyError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GtallyError {
    fn from(err: gix::object::commit::Error) -> Self {
        GtallyError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GtallyError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GtallyError::ObjectFind(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for GtallyError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        GtallyError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::date::parse::Error> for GtallyError {
    fn from(err: gix::date::parse::Error) -> Self {
        GtallyError::SignatureDate(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GtallyError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GtallyError::ObjectDecode(Box::new(err))
    }
}

impl From<ureq::Error> for GtallyError {
    fn from(err: ureq::Error) -> Self {
        GtallyError::Api(Box::new(err))
    }
}
