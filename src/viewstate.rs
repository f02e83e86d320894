//! Persisted view state
//!
//! The current root and detail filter round-trip through a compact token so
//! an embedder can restore a view later. Root names may contain any
//! punctuation (including `#` disambiguators and `:`), so the name half is
//! base64url-encoded; the detail half is `everyone`, `inf`, or a decimal
//! generation depth.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

use crate::graph::Filter;

/// A restorable view: which root, how much detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub root: String,
    pub filter: Filter,
}

/// Errors decoding a view-state token
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("view-state token has no ':' separator")]
    MissingSeparator,
    #[error("view-state token holds an invalid root name")]
    BadRoot,
    #[error("view-state token holds an invalid detail value '{value}'")]
    BadDetail { value: String },
}

/// Encode a view into its token.
pub fn encode(state: &ViewState) -> String {
    let detail = if state.filter.include_all {
        "everyone".to_string()
    } else {
        match state.filter.depth {
            None => "inf".to_string(),
            Some(depth) => depth.to_string(),
        }
    };
    format!("{}:{detail}", URL_SAFE_NO_PAD.encode(state.root.as_bytes()))
}

/// Decode a token back into the view it was made from.
pub fn decode(token: &str) -> Result<ViewState, StateError> {
    let (name, detail) = token.split_once(':').ok_or(StateError::MissingSeparator)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(name)
        .map_err(|_| StateError::BadRoot)?;
    let root = String::from_utf8(bytes).map_err(|_| StateError::BadRoot)?;
    let filter = match detail {
        "everyone" => Filter::everyone(),
        "inf" => Filter::blood(),
        other => Filter::depth(other.parse().map_err(|_| StateError::BadDetail {
            value: other.to_string(),
        })?),
    };
    Ok(ViewState { root, filter })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(root: &str, filter: Filter) {
        let state = ViewState {
            root: root.to_string(),
            filter,
        };
        assert_eq!(decode(&encode(&state)), Ok(state));
    }

    #[test]
    fn test_roundtrip_plain_name() {
        roundtrip("Leopold", Filter::depth(2));
    }

    #[test]
    fn test_roundtrip_reserved_punctuation() {
        roundtrip("?#12", Filter::depth(0));
        roundtrip("Anna-Lena: the 2nd + more", Filter::blood());
    }

    #[test]
    fn test_roundtrip_all_filters() {
        roundtrip("X", Filter::everyone());
        roundtrip("X", Filter::blood());
        roundtrip("X", Filter::depth(7));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode("no-separator"), Err(StateError::MissingSeparator));
        assert!(matches!(decode("!!!:1"), Err(StateError::BadRoot)));
        assert!(matches!(
            decode(&format!("{}:soon", URL_SAFE_NO_PAD.encode("X"))),
            Err(StateError::BadDetail { .. })
        ));
    }
}
