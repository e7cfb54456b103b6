//! Fixture builders shared by the unit tests.

use std::fmt::Write;

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_GPS_IFD_POINTER: u16 = 0x8825;
const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
const TAG_GPS_LATITUDE: u16 = 0x0002;
const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
const TAG_GPS_LONGITUDE: u16 = 0x0004;

/// GPS fields to put into a fixture image. `None` leaves the tag out.
#[derive(Clone, Copy)]
pub struct GpsTags<'a> {
    pub lat: Option<[(u32, u32); 3]>,
    pub lat_ref: Option<&'a str>,
    pub lon: Option<[(u32, u32); 3]>,
    pub lon_ref: Option<&'a str>,
}

impl<'a> GpsTags<'a> {
    pub fn new(lat: [(u32, u32); 3], lat_ref: &'a str, lon: [(u32, u32); 3], lon_ref: &'a str) -> Self {
        GpsTags {
            lat: Some(lat),
            lat_ref: Some(lat_ref),
            lon: Some(lon),
            lon_ref: Some(lon_ref),
        }
    }
}

struct Entry {
    tag: u16,
    typ: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn ascii(tag: u16, s: &str) -> Entry {
        let mut data = s.as_bytes().to_vec();
        data.push(0);
        Entry { tag, typ: ASCII, count: data.len() as u32, data }
    }

    fn rationals(tag: u16, values: &[(u32, u32)]) -> Entry {
        let mut data = Vec::new();
        for (num, denom) in values {
            data.extend_from_slice(&num.to_le_bytes());
            data.extend_from_slice(&denom.to_le_bytes());
        }
        Entry { tag, typ: RATIONAL, count: values.len() as u32, data }
    }

    fn short(tag: u16, v: u16) -> Entry {
        Entry { tag, typ: SHORT, count: 1, data: v.to_le_bytes().to_vec() }
    }

    fn long(tag: u16, v: u32) -> Entry {
        Entry { tag, typ: LONG, count: 1, data: v.to_le_bytes().to_vec() }
    }

    fn out_of_line_len(&self) -> usize {
        if self.data.len() > 4 {
            self.data.len() + self.data.len() % 2
        } else {
            0
        }
    }
}

fn ifd_len(entries: &[Entry]) -> usize {
    2 + 12 * entries.len() + 4 + entries.iter().map(Entry::out_of_line_len).sum::<usize>()
}

// Appends an IFD at the current end of `buf`; the IFD offset is `buf.len()`.
fn write_ifd(buf: &mut Vec<u8>, entries: &mut Vec<Entry>) {
    entries.sort_by_key(|e| e.tag);

    let start = buf.len();
    let mut data_offset = start + 2 + 12 * entries.len() + 4;
    let mut extra = Vec::new();

    buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for e in entries.iter() {
        buf.extend_from_slice(&e.tag.to_le_bytes());
        buf.extend_from_slice(&e.typ.to_le_bytes());
        buf.extend_from_slice(&e.count.to_le_bytes());

        if e.data.len() <= 4 {
            let mut inline = e.data.clone();
            inline.resize(4, 0);
            buf.extend_from_slice(&inline);
        } else {
            buf.extend_from_slice(&(data_offset as u32).to_le_bytes());
            extra.extend_from_slice(&e.data);
            if e.data.len() % 2 == 1 {
                extra.push(0);
            }
            data_offset += e.out_of_line_len();
        }
    }
    // no next IFD
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&extra);
}

/// Builds a little-endian TIFF block as found in an EXIF APP1 segment.
fn tiff(gps: Option<GpsTags>) -> Vec<u8> {
    let mut ifd0 = vec![Entry::short(TAG_ORIENTATION, 1)];

    let mut gps_ifd = Vec::new();
    if let Some(gps) = gps {
        if let Some(r) = gps.lat_ref {
            gps_ifd.push(Entry::ascii(TAG_GPS_LATITUDE_REF, r));
        }
        if let Some(v) = gps.lat {
            gps_ifd.push(Entry::rationals(TAG_GPS_LATITUDE, &v));
        }
        if let Some(r) = gps.lon_ref {
            gps_ifd.push(Entry::ascii(TAG_GPS_LONGITUDE_REF, r));
        }
        if let Some(v) = gps.lon {
            gps_ifd.push(Entry::rationals(TAG_GPS_LONGITUDE, &v));
        }
    }

    let mut buf = b"II\x2a\x00\x08\x00\x00\x00".to_vec();

    if gps_ifd.is_empty() {
        write_ifd(&mut buf, &mut ifd0);
    } else {
        // the pointer entry itself is inline, so adding it does not move the GPS IFD
        ifd0.push(Entry::long(TAG_GPS_IFD_POINTER, 0));
        let gps_offset = 8 + ifd_len(&ifd0);
        ifd0.pop();
        ifd0.push(Entry::long(TAG_GPS_IFD_POINTER, gps_offset as u32));

        write_ifd(&mut buf, &mut ifd0);
        assert_eq!(buf.len(), gps_offset);
        write_ifd(&mut buf, &mut gps_ifd);
    }

    buf
}

/// A minimal JPEG stream carrying an EXIF segment, optionally with GPS tags.
pub fn jpeg_with_exif(gps: Option<GpsTags>) -> Vec<u8> {
    let tiff = tiff(gps);
    let len = (2 + 6 + tiff.len()) as u16;

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

/// A minimal JPEG stream without any metadata segment.
pub fn jpeg_without_exif() -> Vec<u8> {
    vec![0xff, 0xd8, 0xff, 0xd9]
}

/// 45deg 30' 0" N, 7deg 15' 0" E
pub fn turin_ish<'a>() -> GpsTags<'a> {
    GpsTags::new([(45, 1), (30, 1), (0, 1)], "N", [(7, 1), (15, 1), (0, 1)], "E")
}

/// Renders a GPX 1.1 document; `tracks[t][s]` lists the points of segment `s` of track `t`.
pub fn gpx_document(tracks: &[Vec<Vec<(f64, f64, Option<f64>)>>]) -> String {
    let mut doc = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpxmap tests" xmlns="http://www.topografix.com/GPX/1/1">
"#,
    );

    for (i, track) in tracks.iter().enumerate() {
        let _ = writeln!(doc, "  <trk>\n    <name>track {}</name>", i);
        for segment in track.iter() {
            doc.push_str("    <trkseg>\n");
            for (lat, lon, ele) in segment.iter() {
                match ele {
                    Some(ele) => {
                        let _ = writeln!(doc, r#"      <trkpt lat="{}" lon="{}"><ele>{}</ele></trkpt>"#, lat, lon, ele);
                    }
                    None => {
                        let _ = writeln!(doc, r#"      <trkpt lat="{}" lon="{}"></trkpt>"#, lat, lon);
                    }
                }
            }
            doc.push_str("    </trkseg>\n");
        }
        doc.push_str("  </trk>\n");
    }

    doc.push_str("</gpx>\n");
    doc
}
