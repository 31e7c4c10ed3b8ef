//! Certificate fixtures generated with rcgen.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rcgen::{
    date_time_ymd, BasicConstraints, BmpString, Certificate, CertificateParams,
    DistinguishedName, DnType, DnValue, IsCa, KeyPair, KeyUsagePurpose,
};

/// A generated certificate together with its private key.
pub struct Issued {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issued {
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }

    pub fn pem(&self) -> String {
        self.cert.pem()
    }
}

/// Calendar date as (year, month, day).
pub type Ymd = (i32, u8, u8);

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn params(cn: &str, ca: bool, from: Ymd, to: Ymd) -> CertificateParams {
    let mut params = CertificateParams::default();

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    dn.push(DnType::OrganizationName, "Trust Anchor Test");
    params.distinguished_name = dn;

    if ca {
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    } else {
        params.is_ca = IsCa::NoCa;
        params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    }

    params.not_before = date_time_ymd(from.0, from.1, from.2);
    params.not_after = date_time_ymd(to.0, to.1, to.2);
    params
}

/// Self-signed CA certificate with a fresh key.
pub fn root(cn: &str, from: Ymd, to: Ymd) -> Issued {
    root_with_key(cn, KeyPair::generate().unwrap(), from, to)
}

/// Self-signed CA certificate over an existing key.
pub fn root_with_key(cn: &str, key: KeyPair, from: Ymd, to: Ymd) -> Issued {
    let cert = params(cn, true, from, to).self_signed(&key).unwrap();
    Issued { cert, key }
}

/// Self-signed CA whose common name is a BMPString, or absent when `cn` is
/// `None`.
pub fn root_with_bmp_cn(cn: Option<&str>, from: Ymd, to: Ymd) -> Issued {
    let mut params = params("unused", true, from, to);
    let mut dn = DistinguishedName::new();
    if let Some(cn) = cn {
        dn.push(
            DnType::CommonName,
            DnValue::BmpString(BmpString::try_from(cn).unwrap()),
        );
    }
    dn.push(DnType::OrganizationName, "Trust Anchor Test");
    params.distinguished_name = dn;

    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    Issued { cert, key }
}

/// Copy of a key pair, for building two certificates over one key.
pub fn clone_key(key: &KeyPair) -> KeyPair {
    KeyPair::from_pem(&key.serialize_pem()).unwrap()
}

/// Copy of `der` with the final byte of the signature value flipped.
pub fn corrupt_signature(der: &[u8]) -> Vec<u8> {
    let mut out = der.to_vec();
    if let Some(last) = out.last_mut() {
        *last ^= 0x01;
    }
    out
}

/// CA certificate signed by `issuer`.
pub fn intermediate(cn: &str, issuer: &Issued, from: Ymd, to: Ymd) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = params(cn, true, from, to)
        .signed_by(&key, &issuer.cert, &issuer.key)
        .unwrap();
    Issued { cert, key }
}

/// End-entity certificate signed by `issuer`.
pub fn leaf(cn: &str, issuer: &Issued, from: Ymd, to: Ymd) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = params(cn, false, from, to)
        .signed_by(&key, &issuer.cert, &issuer.key)
        .unwrap();
    Issued { cert, key }
}

/// The scenario used across tests: roots "Root A" and "Root B", and a leaf
/// issued by A that outlives A.
pub struct Scenario {
    pub root_a: Issued,
    pub root_b: Issued,
    pub leaf_a: Issued,
}

impl Scenario {
    pub fn new() -> Self {
        let root_a = root("Root A", (2020, 1, 1), (2027, 1, 1));
        let root_b = root("Root B", (2020, 1, 1), (2040, 1, 1));
        let leaf_a = leaf("www.example.com", &root_a, (2024, 1, 1), (2030, 1, 1));
        Self {
            root_a,
            root_b,
            leaf_a,
        }
    }

    pub fn anchors(&self) -> Vec<Vec<u8>> {
        vec![self.root_a.der(), self.root_b.der()]
    }

    pub fn chain(&self) -> Vec<Vec<u8>> {
        vec![self.leaf_a.der(), self.root_a.der()]
    }
}
