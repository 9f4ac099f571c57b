use crate::error::ObservationError;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// SIGPROC filterbank header fields consumed and produced by the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterbankHeader {
    pub source_name: String,
    /// Frequency of channel 0, MHz. Channels descend from here.
    pub fch1: f64,
    /// Channel spacing, MHz; negative for descending channels.
    pub foff: f64,
    pub nchans: usize,
    /// Time resolution, seconds.
    pub tsamp: f64,
    /// Observation start, MJD.
    pub tstart: f64,
    pub nbits: u32,
    pub nifs: u32,
}

impl FilterbankHeader {
    /// Magnitude of the channel spacing, MHz.
    pub fn df(&self) -> f64 {
        self.foff.abs()
    }

    /// Top of the observation band, MHz.
    pub fn top_mhz(&self) -> f64 {
        self.fch1
    }

    /// Bottom of the observation band, MHz.
    pub fn bottom_mhz(&self) -> f64 {
        self.fch1 - self.nchans as f64 * self.df()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        put_label(writer, "HEADER_START")?;
        put_i32(writer, "telescope_id", 0)?;
        put_i32(writer, "machine_id", 0)?;
        put_i32(writer, "data_type", 1)?;
        put_label(writer, "source_name")?;
        let name = if self.source_name.is_empty() {
            "unknown"
        } else {
            &self.source_name
        };
        put_label(writer, name)?;
        put_i32(writer, "nbits", self.nbits as i32)?;
        put_i32(writer, "nifs", self.nifs as i32)?;
        put_i32(writer, "nchans", self.nchans as i32)?;
        put_f64(writer, "fch1", self.fch1)?;
        put_f64(writer, "foff", self.foff)?;
        put_f64(writer, "tsamp", self.tsamp)?;
        put_f64(writer, "tstart", self.tstart)?;
        put_label(writer, "HEADER_END")
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ObservationError> {
        let truncated =
            |err: io::Error| ObservationError::Header(format!("truncated header: {err}"));

        let start = take_label(reader).map_err(truncated)?;
        if start != "HEADER_START" {
            return Err(ObservationError::Header(format!(
                "expected HEADER_START, found `{start}`"
            )));
        }

        let mut header = FilterbankHeader {
            source_name: String::new(),
            fch1: 0.0,
            foff: 0.0,
            nchans: 0,
            tsamp: 0.0,
            tstart: 0.0,
            nbits: 0,
            nifs: 1,
        };

        loop {
            let key = take_label(reader).map_err(truncated)?;
            match key.as_str() {
                "HEADER_END" => break,
                "source_name" => header.source_name = take_label(reader).map_err(truncated)?,
                "rawdatafile" => {
                    take_label(reader).map_err(truncated)?;
                }
                "fch1" => header.fch1 = take_f64(reader).map_err(truncated)?,
                "foff" => header.foff = take_f64(reader).map_err(truncated)?,
                "tsamp" => header.tsamp = take_f64(reader).map_err(truncated)?,
                "tstart" => header.tstart = take_f64(reader).map_err(truncated)?,
                "az_start" | "za_start" | "src_raj" | "src_dej" | "refdm" | "period" => {
                    take_f64(reader).map_err(truncated)?;
                }
                "nchans" => header.nchans = take_i32(reader).map_err(truncated)? as usize,
                "nbits" => header.nbits = take_i32(reader).map_err(truncated)? as u32,
                "nifs" => header.nifs = take_i32(reader).map_err(truncated)? as u32,
                "telescope_id" | "machine_id" | "data_type" | "barycentric" | "pulsarcentric"
                | "nbeams" | "ibeam" | "nsamples" => {
                    take_i32(reader).map_err(truncated)?;
                }
                other => {
                    return Err(ObservationError::Header(format!(
                        "unknown header keyword `{other}`"
                    )));
                }
            }
        }

        if header.nchans == 0 {
            return Err(ObservationError::Header("nchans missing or zero".into()));
        }
        Ok(header)
    }
}

fn put_label<W: Write>(writer: &mut W, label: &str) -> io::Result<()> {
    writer.write_all(&(label.len() as u32).to_le_bytes())?;
    writer.write_all(label.as_bytes())
}

fn put_i32<W: Write>(writer: &mut W, key: &str, value: i32) -> io::Result<()> {
    put_label(writer, key)?;
    writer.write_all(&value.to_le_bytes())
}

fn put_f64<W: Write>(writer: &mut W, key: &str, value: f64) -> io::Result<()> {
    put_label(writer, key)?;
    writer.write_all(&value.to_le_bytes())
}

fn take_label<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len == 0 || len > 128 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("implausible keyword length {len}"),
        ));
    }
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}

fn take_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

fn take_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(f64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> FilterbankHeader {
        FilterbankHeader {
            source_name: "HIP3092".into(),
            fch1: 2000.0,
            foff: -0.00286102294921875,
            nchans: 1024,
            tsamp: 18.253611008,
            tstart: 57557.0,
            nbits: 32,
            nifs: 1,
        }
    }

    #[test]
    fn header_round_trips_through_bytes() {
        let header = sample_header();
        let mut buffer = Vec::new();
        header.write_to(&mut buffer).unwrap();
        let parsed = FilterbankHeader::read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn header_rejects_missing_start_marker() {
        let mut buffer = Vec::new();
        put_label(&mut buffer, "fch1").unwrap();
        let err = FilterbankHeader::read_from(&mut buffer.as_slice()).unwrap_err();
        assert!(matches!(err, ObservationError::Header(_)));
    }

    #[test]
    fn band_edges_follow_channel_spacing() {
        let header = sample_header();
        assert_eq!(header.top_mhz(), 2000.0);
        let expected = 2000.0 - 1024.0 * header.df();
        assert!((header.bottom_mhz() - expected).abs() < 1e-9);
    }
}
