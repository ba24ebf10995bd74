//! Substitution table loading
//!
//! The table maps literal substrings to replacements (e.g. `"[.]"` → `"."`)
//! and is applied to every raw line before tokenization. It can live next
//! to the data as `subs.json` (also TOML/YAML), or be named explicitly with
//! `--subs`.

pub mod loader;

pub use loader::load_substitutions;
