//! Grammar artifact caching.
//!
//! The composed grammar is compiled once per language and persisted as a
//! JSON artifact keyed by a content hash of the rule sources plus the
//! grammar version. On load, a matching hash lets the stored fragment set
//! be reused; any mismatch (or `overwrite_cache`) triggers recompilation
//! from the built-in rules. Artifacts are written atomically
//! (write-to-tmp + rename) so readers never observe a partial file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::grammar::{self, Fragment, Grammar};
use crate::language::Language;

/// Bumped whenever rule semantics change in a way that should invalidate
/// existing artifacts even if the serialized fragments happen to match.
const GRAMMAR_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
    version: u32,
    language: String,
    hash: String,
    fragments: Vec<Fragment>,
}

/// Content hash over the grammar version, language, and every fragment's
/// name, weight, pattern source, and emit spec, in order.
pub fn content_hash(language: Language, fragments: &[Fragment]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(GRAMMAR_VERSION.to_le_bytes());
    hasher.update(language.code().as_bytes());
    for frag in fragments {
        hasher.update(frag.name.as_bytes());
        hasher.update(frag.weight.to_le_bytes());
        hasher.update(frag.pattern.as_bytes());
        // The emit spec is part of the rule source; serialize it canonically.
        if let Ok(spec) = serde_json::to_vec(&frag.emit) {
            hasher.update(&spec);
        }
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn artifact_path(cache_dir: &Path, language: Language) -> PathBuf {
    cache_dir.join(format!("timetag-grammar-{}.json", language.code()))
}

fn try_load(path: &Path, language: Language, expected_hash: &str) -> Option<Vec<Fragment>> {
    let bytes = fs::read(path).ok()?;
    let artifact: Artifact = match serde_json::from_slice(&bytes) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("corrupt grammar artifact at {}: {e}", path.display());
            return None;
        }
    };
    if artifact.version != GRAMMAR_VERSION
        || artifact.language != language.code()
        || artifact.hash != expected_hash
    {
        log::debug!(
            "grammar artifact at {} is stale (version/hash mismatch)",
            path.display()
        );
        return None;
    }
    Some(artifact.fragments)
}

fn store(path: &Path, language: Language, hash: &str, fragments: &[Fragment]) -> Result<(), Error> {
    let artifact = Artifact {
        version: GRAMMAR_VERSION,
        language: language.code().to_string(),
        hash: hash.to_string(),
        fragments: fragments.to_vec(),
    };
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(Error::CacheWrite)?;
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(Error::CacheWrite)?;
    serde_json::to_writer(&tmp, &artifact)
        .map_err(|e| Error::CacheWrite(std::io::Error::other(e)))?;
    tmp.persist(path)
        .map_err(|e| Error::CacheWrite(e.error))?;
    Ok(())
}

/// Load the grammar for `language`, consulting the artifact under
/// `cache_dir` when given. A missing, corrupt, or stale artifact falls back
/// to recompiling from the built-in rules and rewriting the artifact;
/// `overwrite` skips the load entirely.
pub fn load_or_compile(
    language: Language,
    cache_dir: Option<&Path>,
    overwrite: bool,
) -> Result<Grammar, Error> {
    let builtin = grammar::fragments_for(language)?;
    let hash = content_hash(language, &builtin);

    if let Some(dir) = cache_dir {
        let path = artifact_path(dir, language);
        if !overwrite {
            if let Some(fragments) = try_load(&path, language, &hash) {
                log::debug!("loaded grammar artifact from {}", path.display());
                return Grammar::compile(language, fragments, hash);
            }
        }
        let grammar = Grammar::compile(language, builtin, hash.clone())?;
        store(&path, language, &hash, &grammar.fragments)?;
        log::debug!("wrote grammar artifact to {}", path.display());
        return Ok(grammar);
    }

    Grammar::compile(language, builtin, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_language_sensitive() {
        let zh = grammar::fragments_for(Language::Chinese).unwrap();
        let en = grammar::fragments_for(Language::English).unwrap();
        let h1 = content_hash(Language::Chinese, &zh);
        let h2 = content_hash(Language::Chinese, &zh);
        let h3 = content_hash(Language::English, &en);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_hash_tracks_rule_changes() {
        let mut frags = grammar::fragments_for(Language::Chinese).unwrap();
        let before = content_hash(Language::Chinese, &frags);
        frags[0].weight += 1;
        let after = content_hash(Language::Chinese, &frags);
        assert_ne!(before, after);
    }
}
