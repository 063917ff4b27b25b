//! Single-line tower layout strings for sharing a defence between sessions.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use elemental_defence_core::{CellCoord, TowerKind};
use elemental_defence_world::{query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "elemental";
const LAYOUT_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Towers standing on a grid of known dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TowerLayout {
    /// Number of grid columns.
    pub(crate) columns: u32,
    /// Number of grid rows.
    pub(crate) rows: u32,
    /// Towers in placement order.
    pub(crate) towers: Vec<LayoutTower>,
}

/// One tower captured in a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Element of the tower.
    pub(crate) kind: TowerKind,
    /// Cell the tower stands on.
    pub(crate) cell: CellCoord,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    towers: Vec<LayoutTower>,
}

impl TowerLayout {
    /// Captures every tower standing in `world`.
    pub(crate) fn capture(world: &World) -> Self {
        let (columns, rows) = query::dimensions(world);
        let towers = query::tower_view(world)
            .iter()
            .map(|tower| LayoutTower {
                kind: tower.kind,
                cell: tower.cell,
            })
            .collect();
        Self {
            columns,
            rows,
            towers,
        }
    }

    /// Encodes the layout as `elemental:v1:<columns>x<rows>:<payload>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&Payload {
            towers: self.towers.clone(),
        })
        .map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{LAYOUT_DOMAIN}:{LAYOUT_VERSION}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a layout string produced by [`TowerLayout::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::Empty);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::Truncated)?;
        let version = parts.next().ok_or(LayoutTransferError::Truncated)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::Truncated)?;
        let payload = parts.next().ok_or(LayoutTransferError::Truncated)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let Payload { towers } =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            towers,
        })
    }
}

/// Reasons a layout string cannot be decoded.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The string was empty or whitespace.
    #[error("layout string was empty")]
    Empty,
    /// The string has fewer than four fields.
    #[error("layout string is missing fields")]
    Truncated,
    /// The string does not describe an Elemental Defence layout.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The layout format version is unknown.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions field is not `<columns>x<rows>`.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The payload is not valid base64.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload is not a valid tower list.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok((columns, rows))
}
