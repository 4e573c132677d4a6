// Middleware modules for the PhishGuard backend

pub mod cors;

pub use cors::dynamic_cors_middleware;
