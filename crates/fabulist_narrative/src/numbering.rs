//! Global section and segment numbering.

use crate::validator::DraftPart;
use fabulist_core::{PartKind, Section, Segment};

/// The two running counters of one expansion.
///
/// Owned by a single expansion and passed by `&mut` from part to part, so
/// numbering continues across parts and concurrent expansions never share
/// a counter. Numbers are only issued for drafts that already passed
/// validation, which keeps the run gap-free.
///
/// # Examples
///
/// ```
/// use fabulist_core::PartKind;
/// use fabulist_narrative::{DraftPart, DraftSection, DraftSegment, NumberingCounter};
///
/// let draft = DraftPart {
///     sections: vec![DraftSection {
///         segments: vec![
///             DraftSegment { speaker: "Narrator".into(), content: "Once.".into() },
///             DraftSegment { speaker: "Max".into(), content: "Woof.".into() },
///         ],
///     }],
/// };
///
/// let mut counter = NumberingCounter::new();
/// let first = counter.assign(PartKind::Beginning, draft.clone());
/// let second = counter.assign(PartKind::Middle, draft);
///
/// assert_eq!(*first[0].section_number(), 1);
/// assert_eq!(*second[0].section_number(), 2);
/// assert_eq!(*second[0].segments()[0].segment_number(), 3);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NumberingCounter {
    sections_issued: u32,
    segments_issued: u32,
}

impl NumberingCounter {
    /// Counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next section number.
    pub fn next_section(&mut self) -> u32 {
        self.sections_issued += 1;
        self.sections_issued
    }

    /// Issue the next segment number.
    pub fn next_segment(&mut self) -> u32 {
        self.segments_issued += 1;
        self.segments_issued
    }

    /// Sections numbered so far.
    pub fn sections_issued(&self) -> u32 {
        self.sections_issued
    }

    /// Segments numbered so far.
    pub fn segments_issued(&self) -> u32 {
        self.segments_issued
    }

    /// Number a validated draft, continuing from the previous part.
    pub fn assign(&mut self, part_kind: PartKind, draft: DraftPart) -> Vec<Section> {
        draft
            .sections
            .into_iter()
            .map(|section| {
                let section_number = self.next_section();
                let segments = section
                    .segments
                    .into_iter()
                    .map(|segment| {
                        Segment::new(
                            self.next_segment(),
                            section_number,
                            part_kind,
                            segment.speaker,
                            segment.content,
                        )
                    })
                    .collect();
                Section::new(section_number, part_kind, segments)
            })
            .collect()
    }
}
