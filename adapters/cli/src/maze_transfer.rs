use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_nav_core::{Maze, NavError, Openings};
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "maze";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded maze payload.
pub(crate) const TRANSFER_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, maze dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a maze into a single-line string suitable for clipboard transfer.
///
/// The payload is the JSON array of per-cell opening masks in row-major
/// order, base64 encoded without padding.
pub(crate) fn encode(maze: &Maze) -> Result<String, MazeTransferError> {
    let masks: Vec<u8> = maze.cells().iter().map(|openings| openings.bits()).collect();
    let json = serde_json::to_vec(&masks).map_err(MazeTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        maze.columns(),
        maze.rows()
    ))
}

/// Decodes and validates a maze from its transfer string.
pub(crate) fn decode(value: &str) -> Result<Maze, MazeTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MazeTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(MazeTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(MazeTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(MazeTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(MazeTransferError::MissingPayload)?;
    if parts.next().is_some() {
        return Err(MazeTransferError::TrailingFields);
    }

    if domain != TRANSFER_DOMAIN {
        return Err(MazeTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(MazeTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(MazeTransferError::InvalidEncoding)?;
    let masks: Vec<u8> =
        serde_json::from_slice(&bytes).map_err(MazeTransferError::InvalidPayload)?;

    let cells = masks
        .into_iter()
        .map(|bits| Openings::from_bits(bits).ok_or(MazeTransferError::InvalidMask(bits)))
        .collect::<Result<Vec<_>, _>>()?;

    Maze::new(columns, rows, cells).map_err(MazeTransferError::InvalidMaze)
}

/// Errors that can occur while encoding or decoding maze transfer strings.
#[derive(Debug, Error)]
pub(crate) enum MazeTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("maze string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("maze string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("maze string is missing the version")]
    MissingVersion,
    /// The dimensions segment was missing.
    #[error("maze string is missing the dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("maze string is missing the payload")]
    MissingPayload,
    /// More segments followed the payload.
    #[error("maze string has unexpected fields after the payload")]
    TrailingFields,
    /// The prefix segment named another format.
    #[error("maze prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment is not understood.
    #[error("maze version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions could not be parsed or were zero.
    #[error("could not parse maze dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode maze payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload was not a JSON array of masks.
    #[error("could not parse maze payload")]
    InvalidPayload(#[source] serde_json::Error),
    /// A mask used bits outside the four wall flags.
    #[error("mask {0:#06b} uses bits outside the four walls")]
    InvalidMask(u8),
    /// The masks did not form a consistent maze.
    #[error("maze payload is inconsistent")]
    InvalidMaze(#[source] NavError),
    /// The masks could not be serialised.
    #[error("could not serialise maze masks")]
    Serialize(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), MazeTransferError> {
    let invalid = || MazeTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
