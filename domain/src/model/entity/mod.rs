pub mod resources;

pub use self::resources::ResourceRequest;
