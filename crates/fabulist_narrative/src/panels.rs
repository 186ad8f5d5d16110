//! Deterministic mapping of panels onto the segment sequence.

use derive_getters::Getters;
use fabulist_error::{FabulistResult, StoryError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Largest panel batch accepted in one request.
pub const MAX_PANELS: u32 = 100;

/// The slice of the story one panel illustrates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PanelAssignment {
    /// Panel slot, 1-based
    panel_number: u32,
    /// Index into the segment list of the segment the scene is drawn from
    anchor_index: usize,
    /// Indices of every segment this panel covers
    segments: Range<usize>,
}

/// Maps `number_of_panels` panels onto `segment_count` segments.
///
/// Segments are split into contiguous, evenly sized runs, one per panel.
/// Each panel's anchor is spread evenly from the first segment to the last,
/// so panel 1 is always anchored to the first segment and panel P to the
/// last. When there are more panels than segments, runs overlap and several
/// panels share a segment.
///
/// # Examples
///
/// ```
/// use fabulist_narrative::PanelAllocator;
///
/// let panels = PanelAllocator::allocate(12, 6).unwrap();
/// assert_eq!(panels.len(), 6);
/// assert_eq!(*panels[0].anchor_index(), 0);
/// assert_eq!(*panels[5].anchor_index(), 11);
/// assert_eq!(panels[1].segments(), &(2..4));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelAllocator;

impl PanelAllocator {
    /// Compute the assignment for every panel in panel order.
    ///
    /// The result depends only on the two counts.
    ///
    /// # Errors
    ///
    /// Returns `CallerInputError` if either count is zero or
    /// `number_of_panels` exceeds [`MAX_PANELS`].
    #[track_caller]
    pub fn allocate(segment_count: usize, number_of_panels: u32) -> FabulistResult<Vec<PanelAssignment>> {
        if segment_count == 0 {
            return Err(StoryError::caller_input("cannot allocate panels over an empty story").into());
        }
        if number_of_panels == 0 {
            return Err(StoryError::caller_input("number_of_panels must be at least 1").into());
        }
        if number_of_panels > MAX_PANELS {
            return Err(StoryError::caller_input(format!(
                "number_of_panels must be at most {}, got {}",
                MAX_PANELS, number_of_panels
            ))
            .into());
        }

        let k = segment_count;
        let p = number_of_panels as usize;
        let assignments = (0..p)
            .map(|panel| {
                let start = (panel * k / p).min(k - 1);
                let end = ((panel + 1) * k / p).max(start + 1).min(k);
                let anchor = if p == 1 {
                    (k - 1) / 2
                } else {
                    (panel * (k - 1) + (p - 1) / 2) / (p - 1)
                };
                PanelAssignment {
                    panel_number: panel as u32 + 1,
                    anchor_index: anchor.clamp(start, end - 1),
                    segments: start..end,
                }
            })
            .collect();
        Ok(assignments)
    }
}
