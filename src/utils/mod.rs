pub mod uuid4;

pub use uuid4::validate_uuid4;
