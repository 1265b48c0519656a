//! Social network clients and extractors used by Murmur.
//!
//! Only the TikTok comment pipeline is implemented: live fetch strategies that
//! degrade to nothing, and the normalization core that turns loosely shaped
//! comment payloads into [`tiktok::CanonicalComment`] records.
pub mod source;
pub mod tiktok;
