pub mod abilities;
pub mod combat;
pub mod equipment;
pub mod feats;
pub mod proficiency;
pub mod skills;
