use crate::survey::runner::RecoveryRecord;
use std::fmt::Write;

const HEADER: &str = "#index #ratio #freq_inj #freq_det #drift_inj #drift_det \
#snr_inj #snr_det #width_inj #noise_offset #noise_drift #noise_snr";

/// Renders the recovery summary, one line per record. The detected columns
/// read the first hit row, which is the all-zero placeholder for frames with
/// no detections.
pub fn render_table(records: &[RecoveryRecord]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for record in records {
        let first = record.first_hit();
        let _ = writeln!(
            out,
            "{} {:.3} {:.6} {:.6} {:.3} {:.3} {:.1} {:.1} {:.1} {:.6} {:.3} {:.1}",
            record.index,
            record.ratio(),
            record.injected.f_start_mhz,
            first.uncorrected_freq,
            record.injected.drift_hz_per_s,
            first.drift_rate,
            record.injected.snr,
            first.snr,
            record.injected.width_hz,
            record.noise.f_mhz - record.injected.f_start_mhz,
            record.noise.drift_hz_per_s,
            record.noise.snr,
        );
    }
    out
}

pub fn print_table(records: &[RecoveryRecord]) {
    print!("{}", render_table(records));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::NoiseDescriptor;
    use driftcore::detect::{Hit, HitTable};
    use driftcore::SignalDescriptor;

    fn record(index: usize, hits: HitTable, recovered: usize) -> RecoveryRecord {
        RecoveryRecord {
            index,
            num_recovered: recovered,
            num_injected: 2,
            injected: SignalDescriptor {
                f_start_mhz: 1377.5,
                drift_hz_per_s: 1.0,
                snr: 40.0,
                width_hz: 40.0,
            },
            hits,
            noise: NoiseDescriptor {
                f_mhz: 1377.25,
                drift_hz_per_s: -2.0,
                snr: 20.0,
            },
        }
    }

    #[test]
    fn table_has_a_header_and_one_line_per_record() {
        let hit = Hit {
            drift_rate: 0.9,
            snr: 38.5,
            uncorrected_freq: 1377.500002,
            ..Hit::default()
        };
        let records = vec![
            record(0, HitTable::from_rows(vec![hit]), 1),
            record(1, HitTable::placeholder(), 0),
        ];

        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#index"));
        assert_eq!(lines[0].split_whitespace().count(), 12);
        assert!(lines[1].starts_with("0 0.500"));
        assert!(lines[1].contains("1377.500002"));
    }

    #[test]
    fn placeholder_records_render_zero_detection_columns() {
        let records = vec![record(3, HitTable::placeholder(), 0)];
        let table = render_table(&records);
        let row: Vec<&str> = table.lines().nth(1).unwrap().split_whitespace().collect();
        assert_eq!(row[0], "3");
        assert_eq!(row[1], "0.000");
        // detected frequency, drift, snr all come from the placeholder row
        assert_eq!(row[3], "0.000000");
        assert_eq!(row[5], "0.000");
        assert_eq!(row[7], "0.0");
        // noise offset is relative to the injected frequency
        assert_eq!(row[9], "-0.250000");
    }
}
