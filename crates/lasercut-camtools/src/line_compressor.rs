//! Raster line compression
//!
//! Collapses one scanline into runs of equal, non-zero pixels. Leading and
//! trailing empty pixels are trimmed first, so an empty line yields no runs
//! and the head never travels over blank margins.

/// Horizontal scan direction of a raster line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    LeftToRight,
    RightToLeft,
}

impl ScanDirection {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::LeftToRight,
        }
    }
}

/// A run of equal, non-zero pixels.
///
/// `start` and `end` are pixel indices within the line, inclusive, in scan
/// order: for a right-to-left scan `start >= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<T> {
    pub start: usize,
    pub end: usize,
    pub value: T,
}

impl<T> Run<T> {
    /// Whether the run covers a single pixel
    pub fn is_single_pixel(&self) -> bool {
        self.start == self.end
    }
}

/// Compress a scanline into its non-zero runs, in scan order.
///
/// Zero is the pixel type's default (`false` for bilevel, `0` for grayscale).
/// Gaps between the returned runs are travel.
///
/// Run indices are relative to the start of `line`; the caller adds the
/// raster origin when converting them to positions.
pub fn compress<T>(line: &[T], direction: ScanDirection) -> Vec<Run<T>>
where
    T: Copy + PartialEq + Default,
{
    let zero = T::default();
    let Some(first) = line.iter().position(|p| *p != zero) else {
        return Vec::new();
    };
    let last = line.iter().rposition(|p| *p != zero).unwrap_or(first);

    let mut runs = Vec::new();
    let mut close = |start: usize, end: usize| {
        let value = line[start];
        if value != zero {
            runs.push(Run { start, end, value });
        }
    };

    match direction {
        ScanDirection::LeftToRight => {
            let mut start = first;
            for i in first + 1..=last {
                if line[i] != line[start] {
                    close(start, i - 1);
                    start = i;
                }
            }
            close(start, last);
        }
        ScanDirection::RightToLeft => {
            let mut start = last;
            for i in (first..last).rev() {
                if line[i] != line[start] {
                    close(start, i + 1);
                    start = i;
                }
            }
            close(start, first);
        }
    }

    runs
}
