//! Archive builders

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Cursor, Write};
use xz2::write::XzEncoder;

/// `(path, contents, mode)` triples
pub type Entries<'a> = &'a [(&'a str, &'a [u8], u32)];

pub fn tar(entries: Entries<'_>) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).expect("append tar entry");
    }
    builder.into_inner().expect("finish tar")
}

pub fn tar_gz(entries: Entries<'_>) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&tar(entries)).expect("write gzip");
    enc.finish().expect("finish gzip")
}

pub fn tar_xz(entries: Entries<'_>) -> Vec<u8> {
    let mut enc = XzEncoder::new(Vec::new(), 6);
    enc.write_all(&tar(entries)).expect("write xz");
    enc.finish().expect("finish xz")
}

pub fn tar_zst(entries: Entries<'_>) -> Vec<u8> {
    zstd::encode_all(Cursor::new(tar(entries)), 0).expect("zstd encode")
}

pub fn zip(entries: Entries<'_>) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, data, mode) in entries {
        let options = zip::write::SimpleFileOptions::default().unix_permissions(*mode);
        writer.start_file(*path, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
