use crate::error::ObservationError;
use crate::waterfall::{FilterbankHeader, Frame};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const SYNTH_SOURCE_NAME: &str = "synthetic";

impl Frame {
    /// Serializes the frame as a 32-bit SIGPROC filterbank file, clobbering
    /// any previous file at `path`.
    pub fn save_fil<P: AsRef<Path>>(&self, path: P) -> Result<(), ObservationError> {
        let path = path.as_ref();
        let write_err = |source| ObservationError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);

        let header = FilterbankHeader {
            source_name: SYNTH_SOURCE_NAME.into(),
            fch1: self.fch1(),
            foff: -self.df(),
            nchans: self.fchans(),
            tsamp: self.dt(),
            tstart: self.tstart(),
            nbits: 32,
            nifs: 1,
        };
        header.write_to(&mut writer).map_err(write_err)?;

        for &value in self.data().iter() {
            writer.write_all(&value.to_le_bytes()).map_err(write_err)?;
        }
        writer.flush().map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waterfall::Observation;
    use ndarray::Array2;

    #[test]
    fn saved_frame_reads_back_as_observation() {
        let data = Array2::from_shape_fn((8, 32), |(t, c)| (t * 32 + c) as f32);
        let frame = Frame::new(1420.0, 0.001, 2.0, 58000.5, data.clone());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.fil");
        frame.save_fil(&path).unwrap();

        let obs = Observation::open(&path).unwrap();
        assert_eq!(obs.header().nchans, 32);
        assert_eq!(obs.tchans(), 8);
        assert!((obs.header().fch1 - 1420.0).abs() < 1e-9);
        assert!((obs.header().tsamp - 2.0).abs() < 1e-12);

        let full = obs
            .read_window(obs.header().bottom_mhz(), obs.header().top_mhz())
            .unwrap();
        assert_eq!(full.data(), &data);
    }

    #[test]
    fn save_overwrites_previous_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.fil");

        let first = Frame::new(1420.0, 0.001, 1.0, 0.0, Array2::zeros((4, 16)));
        first.save_fil(&path).unwrap();
        let second = Frame::new(1420.0, 0.001, 1.0, 0.0, Array2::from_elem((2, 16), 3.0));
        second.save_fil(&path).unwrap();

        let obs = Observation::open(&path).unwrap();
        assert_eq!(obs.tchans(), 2);
    }
}
