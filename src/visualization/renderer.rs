//! The renderer capability the driver reports state to.
//!
//! The simulation core never reads anything back from a renderer; it hands
//! over a [`Frame`] after each rendered step and moves on.

use std::io::Write;

use crate::error::SimError;
use crate::simulation::states::NVec3;

/// Snapshot handed to a renderer
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub step: u64,                  // steps taken so far
    pub t: f64,                     // simulation time
    pub positions: &'a [NVec3],     // one per particle
    pub springs: &'a [(usize, usize)], // index pairs to draw as lines
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError>;
}

/// Discards every frame, for benchmarks and tests
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<(), SimError> {
        Ok(())
    }
}

/// Headless renderer writing particle positions as CSV rows:
/// `step,t,particle,x,y,z`
pub struct CsvRecorder<W: Write> {
    out: W,
    header_written: bool,
    frames: u64,
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(out: W) -> Self {
        Self { out, header_written: false, frames: 0 }
    }

    /// Number of frames written so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &Frame<'_>) -> std::io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "step,t,particle,x,y,z")?;
            self.header_written = true;
        }
        for (i, x) in frame.positions.iter().enumerate() {
            writeln!(self.out, "{},{},{},{},{},{}", frame.step, frame.t, i, x.x, x.y, x.z)?;
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for CsvRecorder<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError> {
        self.write_frame(frame).map_err(|e| SimError::Render(e.to_string()))?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_per_particle() {
        let positions = [NVec3::new(0.0, 1.0, 2.0), NVec3::new(3.0, 4.0, 5.0)];
        let frame = Frame { step: 1, t: 0.5, positions: &positions, springs: &[(0, 1)] };

        let mut rec = CsvRecorder::new(Vec::new());
        rec.render(&frame).unwrap();
        assert_eq!(rec.frames(), 1);

        let text = String::from_utf8(rec.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["step,t,particle,x,y,z", "1,0.5,0,0,1,2", "1,0.5,1,3,4,5"]);
    }
}
