//! CSV report emission.
//!
//! Row ordering is part of the contract: zones in table order, records in
//! append order within each zone.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::zones::ZoneTable;

/// Write the `Zone,Type,Name,Value` report to `out`.
pub fn write_report<W: Write>(mut out: W, zones: &ZoneTable) -> io::Result<()> {
    writeln!(out, "Zone,Type,Name,Value")?;
    for (name, zone) in zones.iter() {
        for record in &zone.records {
            writeln!(out, "{name},{},{},{}", record.kind, record.name, record.value)?;
        }
    }
    Ok(())
}

/// Write the report to `path`, creating or truncating the file.
pub fn save_report(path: &Path, zones: &ZoneTable) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, zones)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecordKind, ResourceRecord, Zone};

    fn record(kind: RecordKind, name: &str, value: &str) -> ResourceRecord {
        ResourceRecord {
            kind,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn render(zones: &ZoneTable) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, zones).expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("report must be valid UTF-8")
    }

    #[test]
    fn header_only_for_empty_table() {
        let zones = ZoneTable::new();
        assert_eq!(render(&zones), "Zone,Type,Name,Value\n");
    }

    #[test]
    fn rows_follow_record_append_order() {
        let mut zones = ZoneTable::new();
        let mut zone = Zone::new("default", "default");
        zone.records.push(record(RecordKind::A, "www", "1.2.3.4"));
        zone.records
            .push(record(RecordKind::Cname, "mail", "www.a.com"));
        zones.insert_if_absent("a.com".to_string(), zone);

        assert_eq!(
            render(&zones),
            "Zone,Type,Name,Value\n\
             a.com,A,www,1.2.3.4\n\
             a.com,CNAME,mail,www.a.com\n"
        );
    }

    #[test]
    fn zones_emit_in_table_order() {
        let mut zones = ZoneTable::new();
        let mut first = Zone::new("default", "default");
        first.records.push(record(RecordKind::A, "x", "1.1.1.1"));
        let mut second = Zone::new("default", "default");
        second.records.push(record(RecordKind::A, "y", "2.2.2.2"));
        zones.insert_if_absent("b.com".to_string(), first);
        zones.insert_if_absent("a.com".to_string(), second);

        // No sorting happens at emission time; the table's order is final.
        assert_eq!(
            render(&zones),
            "Zone,Type,Name,Value\n\
             b.com,A,x,1.1.1.1\n\
             a.com,A,y,2.2.2.2\n"
        );
    }

    #[test]
    fn zone_without_records_emits_no_rows() {
        let mut zones = ZoneTable::new();
        zones.insert_if_absent("quiet.com".to_string(), Zone::new("default", "default"));
        assert_eq!(render(&zones), "Zone,Type,Name,Value\n");
    }
}
