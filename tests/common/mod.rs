//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Builder for well-formed `RBXH` cache records.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    link: Vec<u8>,
    status: u32,
    headers: Vec<u8>,
    payload: Vec<u8>,
}

impl RecordBuilder {
    pub fn new(link: &str) -> Self {
        Self {
            link: link.as_bytes().to_vec(),
            status: 200,
            headers: b"content-type: application/octet-stream\r\n".to_vec(),
            payload: Vec::new(),
        }
    }

    pub fn raw_link(mut self, link: &[u8]) -> Self {
        self.link = link.to_vec();
        self
    }

    pub fn status(mut self, status: u32) -> Self {
        self.status = status;
        self
    }

    pub fn headers(mut self, headers: &[u8]) -> Self {
        self.headers = headers.to_vec();
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(37 + self.link.len() + self.headers.len() + self.payload.len());
        buf.extend_from_slice(b"RBXH");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&(self.link.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.link);
        buf.push(0);
        buf.extend_from_slice(&self.status.to_le_bytes());
        buf.extend_from_slice(&(self.headers.len() as u32).to_le_bytes());
        buf.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&[0; 8]);
        buf.extend_from_slice(&self.headers);
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Write the record to `dir/name`, creating parent directories.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, self.to_bytes()).unwrap();
        path
    }
}

/// A minimal OGG page header followed by `body`.
pub fn ogg_payload(body: &[u8]) -> Vec<u8> {
    let mut payload = b"OggS\x00\x02\x00\x00\x00\x00\x00\x00\x00\x00".to_vec();
    payload.extend_from_slice(body);
    payload
}

/// The start of a PNG file.
pub fn png_payload() -> Vec<u8> {
    b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec()
}
