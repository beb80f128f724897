// Authentication: token verification and caller identity

pub mod identity;
pub mod jwt;
