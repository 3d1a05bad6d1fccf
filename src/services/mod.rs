// Service module exports

pub mod occurrence;
