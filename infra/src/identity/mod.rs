//! Identity provider adapter speaking the Supabase-compatible admin API

mod client;
mod wire;

#[cfg(test)]
mod tests;

pub use client::HttpIdentityProvider;
