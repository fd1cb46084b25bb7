pub mod bluebikes;
