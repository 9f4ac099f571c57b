use crate::error::ObservationError;
use crate::waterfall::{FilterbankHeader, Frame};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A read-only filterbank observation on disk.
///
/// Only the header is held in memory; window reads seek into the data
/// section and pull just the requested channels.
#[derive(Debug)]
pub struct Observation {
    path: PathBuf,
    header: FilterbankHeader,
    data_start: u64,
    tchans: usize,
}

impl Observation {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ObservationError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ObservationError::Open {
            path: path.clone(),
            source,
        })?;
        let file_len = file
            .metadata()
            .map_err(|source| ObservationError::Open {
                path: path.clone(),
                source,
            })?
            .len();

        let mut reader = BufReader::new(file);
        let header = FilterbankHeader::read_from(&mut reader)?;
        if header.nbits != 32 {
            return Err(ObservationError::Header(format!(
                "only 32-bit float data is supported, found nbits = {}",
                header.nbits
            )));
        }
        if header.nifs != 1 {
            return Err(ObservationError::Header(format!(
                "only single-IF data is supported, found nifs = {}",
                header.nifs
            )));
        }
        let data_start = reader
            .stream_position()
            .map_err(|source| ObservationError::Read {
                path: path.clone(),
                source,
            })?;

        let row_bytes = header.nchans as u64 * 4;
        let tchans = ((file_len.saturating_sub(data_start)) / row_bytes) as usize;

        Ok(Self {
            path,
            header,
            data_start,
            tchans,
        })
    }

    pub fn header(&self) -> &FilterbankHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of time samples in the observation.
    pub fn tchans(&self) -> usize {
        self.tchans
    }

    /// Reads the channels spanning `[f_start, f_stop)` MHz into a frame
    /// covering the observation's full time extent.
    pub fn read_window(&self, f_start: f64, f_stop: f64) -> Result<Frame, ObservationError> {
        let df = self.header.df();
        let first_chan = ((self.header.fch1 - f_stop) / df).round();
        let width_chans = ((f_stop - f_start) / df).round();
        if first_chan < 0.0 || width_chans < 1.0 {
            return Err(ObservationError::WindowOutOfBand { f_start, f_stop });
        }
        let first_chan = first_chan as usize;
        let width_chans = width_chans as usize;
        if first_chan + width_chans > self.header.nchans {
            return Err(ObservationError::WindowOutOfBand { f_start, f_stop });
        }

        let read_err = |source| ObservationError::Read {
            path: self.path.clone(),
            source,
        };
        let mut file = File::open(&self.path).map_err(|source| ObservationError::Open {
            path: self.path.clone(),
            source,
        })?;

        let mut raw = vec![0u8; width_chans * 4];
        let mut data = Array2::<f32>::zeros((self.tchans, width_chans));
        for t in 0..self.tchans {
            let offset =
                self.data_start + ((t * self.header.nchans + first_chan) as u64) * 4;
            file.seek(SeekFrom::Start(offset)).map_err(read_err)?;
            file.read_exact(&mut raw).map_err(read_err)?;
            for (c, bytes) in raw.chunks_exact(4).enumerate() {
                data[[t, c]] = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
        }

        let window_fch1 = self.header.fch1 - first_chan as f64 * df;
        Ok(Frame::new(
            window_fch1,
            df,
            self.header.tsamp,
            self.header.tstart,
            data,
        ))
    }
}
