// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// IPP/1.1 wire codec (RFC 8010) for the handful of exchanges an AirPrint
// client needs.
//
// Decoding is deliberately shallow: the 8-byte header is parsed exactly, but
// the attribute section is only scanned, never walked.  The document payload
// starts after the first end-of-attributes byte found past the header, and
// the document format is inferred from MIME substrings in the bytes before
// it.  A length field or attribute value containing 0x03 therefore moves the
// boundary early; callers get whatever follows that byte.
//
// Encoding is a fixed set of response templates written through a small
// tag/length/value builder.
//
// ```text
// version-number:  2 bytes (major, minor)
// operation-id / status-code: 2 bytes (big-endian u16)
// request-id:      4 bytes (big-endian u32)
// attribute-groups: variable
//   delimiter-tag: 1 byte
//   attributes:    variable
//     value-tag:    1 byte
//     name-length:  2 bytes (big-endian u16, 0 = additional value)
//     name:         name-length bytes
//     value-length: 2 bytes (big-endian u16)
//     value:        value-length bytes
// end-of-attributes-tag: 1 byte (0x03)
// document-data: remainder
// ```

use bytes::Bytes;

use airprint_core::error::{AirPrintError, Result};
use airprint_core::types::{DocumentFormat, JobId, JobStatus};

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Length of the fixed IPP message header.
pub const HEADER_LEN: usize = 8;

/// IPP version 1.1 major byte.
pub const IPP_VERSION_MAJOR: u8 = 0x01;

/// IPP version 1.1 minor byte.
pub const IPP_VERSION_MINOR: u8 = 0x01;

/// IPP version 1.1 as a single big-endian word.
pub const IPP_VERSION: u16 = 0x0101;

// ---------------------------------------------------------------------------
// IPP delimiter tags (RFC 8010 §3.5.1)
// ---------------------------------------------------------------------------

pub const TAG_OPERATION_ATTRIBUTES: u8 = 0x01;
pub const TAG_JOB_ATTRIBUTES: u8 = 0x02;
/// End-of-attributes-tag -- terminates the attribute section.
pub const TAG_END_OF_ATTRIBUTES: u8 = 0x03;
pub const TAG_PRINTER_ATTRIBUTES: u8 = 0x04;

// ---------------------------------------------------------------------------
// IPP value tags (RFC 8010 §3.5.2)
// ---------------------------------------------------------------------------

/// Integer value (4 bytes, signed big-endian).
pub const VALUE_TAG_INTEGER: u8 = 0x21;
/// Boolean value (1 byte: 0x00 = false, 0x01 = true).
pub const VALUE_TAG_BOOLEAN: u8 = 0x22;
/// Enum value (4 bytes, same encoding as integer).
pub const VALUE_TAG_ENUM: u8 = 0x23;
/// Resolution (4-byte x, 4-byte y, 1-byte unit).
pub const VALUE_TAG_RESOLUTION: u8 = 0x32;
pub const VALUE_TAG_NAME: u8 = 0x42;
pub const VALUE_TAG_KEYWORD: u8 = 0x44;
pub const VALUE_TAG_URI: u8 = 0x45;
pub const VALUE_TAG_CHARSET: u8 = 0x47;
pub const VALUE_TAG_NATURAL_LANGUAGE: u8 = 0x48;
pub const VALUE_TAG_MIME_MEDIA_TYPE: u8 = 0x49;

// ---------------------------------------------------------------------------
// Operations and status codes (RFC 8011 §4, §4.1.8)
// ---------------------------------------------------------------------------

pub const OP_PRINT_JOB: u16 = 0x0002;
pub const OP_VALIDATE_JOB: u16 = 0x0004;
pub const OP_GET_PRINTER_ATTRIBUTES: u16 = 0x000B;

/// Operations advertised in `operations-supported`.
pub const SUPPORTED_OPERATIONS: [u16; 3] = [OP_PRINT_JOB, OP_VALIDATE_JOB, OP_GET_PRINTER_ATTRIBUTES];

/// successful-ok.
pub const STATUS_OK: u16 = 0x0000;

/// Status returned for any operation outside [`SUPPORTED_OPERATIONS`].
///
/// Clients in the field expect 0x0500 here rather than RFC 8011's 0x0501.
pub const STATUS_OPERATION_NOT_SUPPORTED: u16 = 0x0500;

/// server-error-not-accepting-jobs.
pub const STATUS_NOT_ACCEPTING_JOBS: u16 = 0x0506;

/// printer-state: idle.
pub const PRINTER_STATE_IDLE: i32 = 3;

/// Resolution unit: dots per inch.
const RESOLUTION_UNIT_DPI: u8 = 3;

/// Document formats listed in `document-format-supported`.
const DOCUMENT_FORMATS_SUPPORTED: [DocumentFormat; 3] =
    [DocumentFormat::Pdf, DocumentFormat::Jpeg, DocumentFormat::Png];

/// MIME types searched for, in priority order, to classify a request.
const SNIFFED_MIME_TYPES: [&str; 4] = ["application/pdf", "text/plain", "image/jpeg", "image/png"];

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// The fixed 8-byte message header.
///
/// `code` is the operation-id in requests and the status-code in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IppHeader {
    pub version: u16,
    pub code: u16,
    pub request_id: u32,
}

impl IppHeader {
    /// Parse the header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(AirPrintError::MalformedRequest(format!(
                "IPP message too short: {} bytes (minimum {HEADER_LEN})",
                data.len()
            )));
        }
        Ok(Self {
            version: u16::from_be_bytes([data[0], data[1]]),
            code: u16::from_be_bytes([data[2], data[3]]),
            request_id: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
        })
    }
}

/// A request as far as this server needs to understand it.
#[derive(Debug, Clone)]
pub struct IppRequest {
    pub header: IppHeader,
    /// Format guessed from the attribute section.
    pub document_format: DocumentFormat,
    /// Bytes following the first end-of-attributes marker.
    pub document: Bytes,
}

impl IppRequest {
    pub fn operation(&self) -> u16 {
        self.header.code
    }

    pub fn request_id(&self) -> u32 {
        self.header.request_id
    }
}

/// Decode an IPP request body.
///
/// Fails only when the body is shorter than the 8-byte header.
pub fn decode_request(body: &Bytes) -> Result<IppRequest> {
    let header = IppHeader::parse(body)?;

    let marker = body[HEADER_LEN..]
        .iter()
        .position(|&b| b == TAG_END_OF_ATTRIBUTES)
        .map(|offset| HEADER_LEN + offset);

    let (attributes, document) = match marker {
        Some(pos) => (&body[HEADER_LEN..pos], body.slice(pos + 1..)),
        None => (&body[HEADER_LEN..], Bytes::new()),
    };

    Ok(IppRequest {
        header,
        document_format: sniff_document_format(attributes),
        document,
    })
}

/// Classify a document by the first known MIME type mentioned in `attributes`.
pub fn sniff_document_format(attributes: &[u8]) -> DocumentFormat {
    SNIFFED_MIME_TYPES
        .into_iter()
        .find(|mime| find_subsequence(attributes, mime.as_bytes()).is_some())
        .map_or(DocumentFormat::OctetStream, DocumentFormat::from_mime)
}

/// Find the first occurrence of `needle` in `haystack`.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Builder for IPP response messages (RFC 8010 §3.4).
pub struct IppResponseBuilder {
    buf: Vec<u8>,
}

impl IppResponseBuilder {
    /// Start a response with the given status code and request-id.
    pub fn new(status_code: u16, request_id: u32) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.push(IPP_VERSION_MAJOR);
        buf.push(IPP_VERSION_MINOR);
        buf.extend_from_slice(&status_code.to_be_bytes());
        buf.extend_from_slice(&request_id.to_be_bytes());
        Self { buf }
    }

    /// Start a new attribute group.
    pub fn begin_group(&mut self, delimiter: u8) -> &mut Self {
        self.buf.push(delimiter);
        self
    }

    pub fn charset(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(VALUE_TAG_CHARSET, name, value.as_bytes())
    }

    pub fn natural_language(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(VALUE_TAG_NATURAL_LANGUAGE, name, value.as_bytes())
    }

    pub fn uri(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(VALUE_TAG_URI, name, value.as_bytes())
    }

    /// nameWithoutLanguage.
    pub fn name_attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(VALUE_TAG_NAME, name, value.as_bytes())
    }

    pub fn keyword(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(VALUE_TAG_KEYWORD, name, value.as_bytes())
    }

    pub fn mime_type(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(VALUE_TAG_MIME_MEDIA_TYPE, name, value.as_bytes())
    }

    pub fn integer(&mut self, name: &str, value: i32) -> &mut Self {
        self.write_attr(VALUE_TAG_INTEGER, name, &value.to_be_bytes())
    }

    pub fn enum_attr(&mut self, name: &str, value: i32) -> &mut Self {
        self.write_attr(VALUE_TAG_ENUM, name, &value.to_be_bytes())
    }

    pub fn boolean(&mut self, name: &str, value: bool) -> &mut Self {
        self.write_attr(VALUE_TAG_BOOLEAN, name, &[u8::from(value)])
    }

    /// Resolution in dots per inch.
    pub fn resolution_dpi(&mut self, name: &str, x: i32, y: i32) -> &mut Self {
        let mut value = [0u8; 9];
        value[..4].copy_from_slice(&x.to_be_bytes());
        value[4..8].copy_from_slice(&y.to_be_bytes());
        value[8] = RESOLUTION_UNIT_DPI;
        self.write_attr(VALUE_TAG_RESOLUTION, name, &value)
    }

    /// Append another value to the preceding attribute (1setOf).
    ///
    /// Per RFC 8010 §3.1.4, additional values carry name-length = 0.
    pub fn additional(&mut self, value_tag: u8, value: &[u8]) -> &mut Self {
        self.write_attr(value_tag, "", value)
    }

    /// Write a raw attribute (value-tag, name, value bytes).
    pub fn write_attr(&mut self, value_tag: u8, name: &str, value: &[u8]) -> &mut Self {
        self.buf.push(value_tag);
        self.buf
            .extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self.buf
            .extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(value);
        self
    }

    /// Finalise the response: write end-of-attributes tag and return bytes.
    pub fn build(mut self) -> Vec<u8> {
        self.buf.push(TAG_END_OF_ATTRIBUTES);
        self.buf
    }
}

/// Get-Printer-Attributes response.
pub fn encode_get_printer_attributes(request_id: u32, printer_uri: &str, printer_name: &str) -> Vec<u8> {
    let mut resp = IppResponseBuilder::new(STATUS_OK, request_id);
    resp.begin_group(TAG_OPERATION_ATTRIBUTES)
        .charset("attributes-charset", "utf-8")
        .natural_language("attributes-natural-language", "en-us");

    resp.begin_group(TAG_PRINTER_ATTRIBUTES)
        .uri("printer-uri-supported", printer_uri)
        .name_attr("printer-name", printer_name)
        .enum_attr("printer-state", PRINTER_STATE_IDLE)
        .keyword("printer-state-reasons", "none");

    let (first_op, more_ops) = SUPPORTED_OPERATIONS.split_at(1);
    resp.enum_attr("operations-supported", i32::from(first_op[0]));
    for op in more_ops {
        resp.additional(VALUE_TAG_ENUM, &i32::from(*op).to_be_bytes());
    }

    let (first_format, more_formats) = DOCUMENT_FORMATS_SUPPORTED.split_at(1);
    resp.mime_type("document-format-supported", first_format[0].mime_type());
    for format in more_formats {
        resp.additional(VALUE_TAG_MIME_MEDIA_TYPE, format.mime_type().as_bytes());
    }

    resp.boolean("color-supported", true)
        .resolution_dpi("printer-resolution-supported", 300, 300);

    resp.build()
}

/// Print-Job response: the job is queued, not yet printed.
pub fn encode_print_job_accepted(request_id: u32, job_id: JobId) -> Vec<u8> {
    let mut resp = IppResponseBuilder::new(STATUS_OK, request_id);
    resp.begin_group(TAG_JOB_ATTRIBUTES)
        .integer("job-id", job_id.as_ipp_integer())
        .enum_attr("job-state", JobStatus::Pending.ipp_job_state());
    resp.build()
}

/// Validate-Job response: header and end marker only.
pub fn encode_validate_job_ok(request_id: u32) -> Vec<u8> {
    IppResponseBuilder::new(STATUS_OK, request_id).build()
}

/// Error response carrying `status_code` and no attributes.
pub fn encode_error(request_id: u32, status_code: u16) -> Vec<u8> {
    IppResponseBuilder::new(status_code, request_id).build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// One attribute as it appears on the wire.
    #[derive(Debug)]
    struct Attr {
        tag: u8,
        name: String,
        value: Vec<u8>,
    }

    /// A delimiter tag and the attributes that follow it.
    #[derive(Debug)]
    struct Group {
        delimiter: u8,
        attributes: Vec<Attr>,
    }

    /// Strict TLV walk of an encoded response.  Returns the groups and the
    /// number of end-of-attributes tags seen; panics on truncation or on
    /// trailing bytes after the end tag.
    fn walk(data: &[u8]) -> (Vec<Group>, usize) {
        let mut pos = HEADER_LEN;
        let mut groups: Vec<Group> = Vec::new();
        let mut end_tags = 0;

        while pos < data.len() {
            let tag = data[pos];
            pos += 1;
            if tag == TAG_END_OF_ATTRIBUTES {
                end_tags += 1;
                assert_eq!(pos, data.len(), "bytes after end-of-attributes");
                break;
            }
            if tag <= 0x0F {
                groups.push(Group {
                    delimiter: tag,
                    attributes: Vec::new(),
                });
                continue;
            }
            let name_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
            pos += 2;
            let name = String::from_utf8(data[pos..pos + name_len].to_vec()).unwrap();
            pos += name_len;
            let value_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
            pos += 2;
            let value = data[pos..pos + value_len].to_vec();
            pos += value_len;
            groups
                .last_mut()
                .expect("attribute outside of a group")
                .attributes
                .push(Attr { tag, name, value });
        }

        (groups, end_tags)
    }

    fn request(op: u16, request_id: u32, attributes: &[(u8, &str, &[u8])], document: &[u8]) -> Bytes {
        let mut buf = Vec::new();
        buf.extend_from_slice(&IPP_VERSION.to_be_bytes());
        buf.extend_from_slice(&op.to_be_bytes());
        buf.extend_from_slice(&request_id.to_be_bytes());
        buf.push(TAG_OPERATION_ATTRIBUTES);
        for &(tag, name, value) in attributes {
            buf.push(tag);
            buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(&(value.len() as u16).to_be_bytes());
            buf.extend_from_slice(value);
        }
        buf.push(TAG_END_OF_ATTRIBUTES);
        buf.extend_from_slice(document);
        Bytes::from(buf)
    }

    // -- Decoding ---------------------------------------------------------

    #[test]
    fn decodes_literal_get_printer_attributes_header() {
        let body = Bytes::from_static(&[0x01, 0x01, 0x00, 0x0B, 0x00, 0x00, 0x00, 0x2A]);
        let req = decode_request(&body).unwrap();
        assert_eq!(req.header.version, IPP_VERSION);
        assert_eq!(req.operation(), OP_GET_PRINTER_ATTRIBUTES);
        assert_eq!(req.request_id(), 42);
        assert!(req.document.is_empty());
        assert_eq!(req.document_format, DocumentFormat::OctetStream);

        let resp = encode_get_printer_attributes(req.request_id(), "ipp://10.0.0.2:8082/ipp/print", "Office");
        assert_eq!(&resp[..8], &[0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A]);
    }

    #[test]
    fn rejects_body_shorter_than_header() {
        for len in 0..HEADER_LEN {
            let body = Bytes::from(vec![0x01; len]);
            assert!(matches!(
                decode_request(&body),
                Err(AirPrintError::MalformedRequest(_))
            ));
        }
    }

    #[test]
    fn extracts_document_after_end_marker() {
        let doc = b"%PDF-1.7 pretend document";
        let body = request(
            OP_PRINT_JOB,
            9,
            &[(VALUE_TAG_MIME_MEDIA_TYPE, "document-format", b"application/pdf")],
            doc,
        );
        let req = decode_request(&body).unwrap();
        assert_eq!(req.operation(), OP_PRINT_JOB);
        assert_eq!(req.document_format, DocumentFormat::Pdf);
        assert_eq!(&req.document[..], doc);
    }

    #[test]
    fn every_sniffed_mime_type_maps_to_its_own_format() {
        for mime in SNIFFED_MIME_TYPES {
            let format = sniff_document_format(mime.as_bytes());
            assert_ne!(format, DocumentFormat::OctetStream, "{mime}");
            assert_eq!(format.mime_type(), mime);
        }
    }

    #[test]
    fn sniffed_formats_follow_priority_order() {
        assert_eq!(sniff_document_format(b"..image/png..text/plain.."), DocumentFormat::PlainText);
        assert_eq!(sniff_document_format(b"image/jpeg and image/png"), DocumentFormat::Jpeg);
        assert_eq!(sniff_document_format(b"image/png"), DocumentFormat::Png);
        assert_eq!(sniff_document_format(b"image/urf"), DocumentFormat::OctetStream);
    }

    #[test]
    fn format_is_not_sniffed_from_the_payload() {
        let body = request(OP_PRINT_JOB, 1, &[], b"this mentions application/pdf");
        let req = decode_request(&body).unwrap();
        assert_eq!(req.document_format, DocumentFormat::OctetStream);
    }

    #[test]
    fn missing_end_marker_yields_empty_document() {
        let body = Bytes::from_static(&[0x01, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x01, 0x47]);
        let req = decode_request(&body).unwrap();
        assert!(req.document.is_empty());
    }

    #[test]
    fn marker_byte_inside_attributes_moves_boundary_early() {
        // "A4!" has value-length 0x0003: the scan stops at that length byte,
        // so the "document" starts inside the attribute section.
        let body = request(OP_PRINT_JOB, 1, &[(VALUE_TAG_KEYWORD, "media", b"A4!")], b"DATA");
        let req = decode_request(&body).unwrap();
        assert_ne!(&req.document[..], b"DATA");
        assert!(req.document.ends_with(b"A4!\x03DATA"));
    }

    // -- Encoding ---------------------------------------------------------

    #[test]
    fn get_printer_attributes_layout() {
        let uri = "ipp://192.168.1.20:8082/ipp/print";
        let resp = encode_get_printer_attributes(0x0102_0304, uri, "Office Laser");
        assert_eq!(&resp[..8], &[0x01, 0x01, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(*resp.last().unwrap(), TAG_END_OF_ATTRIBUTES);

        let (groups, end_tags) = walk(&resp);
        assert_eq!(end_tags, 1);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].delimiter, TAG_OPERATION_ATTRIBUTES);
        assert_eq!(
            groups
                .iter()
                .filter(|g| g.delimiter == TAG_PRINTER_ATTRIBUTES)
                .count(),
            1
        );

        let op = &groups[0].attributes;
        assert_eq!(op[0].tag, VALUE_TAG_CHARSET);
        assert_eq!(op[0].name, "attributes-charset");
        assert_eq!(op[0].value, b"utf-8");
        assert_eq!(op[1].tag, VALUE_TAG_NATURAL_LANGUAGE);
        assert_eq!(op[1].name, "attributes-natural-language");
        assert_eq!(op[1].value, b"en-us");

        let names: Vec<&str> = groups[1].attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "printer-uri-supported",
                "printer-name",
                "printer-state",
                "printer-state-reasons",
                "operations-supported",
                "",
                "",
                "document-format-supported",
                "",
                "",
                "color-supported",
                "printer-resolution-supported",
            ]
        );
    }

    #[test]
    fn get_printer_attributes_values() {
        let uri = "ipp://192.168.1.20:8082/ipp/print";
        let resp = encode_get_printer_attributes(1, uri, "Office Laser");
        let (groups, _) = walk(&resp);
        let attrs = &groups[1].attributes;

        assert_eq!(attrs[0].value, uri.as_bytes());
        assert_eq!(attrs[1].tag, VALUE_TAG_NAME);
        assert_eq!(attrs[1].value, b"Office Laser");
        assert_eq!(attrs[2].tag, VALUE_TAG_ENUM);
        assert_eq!(attrs[2].value, 3i32.to_be_bytes());
        assert_eq!(attrs[3].value, b"none");

        let ops: Vec<i32> = attrs[4..7]
            .iter()
            .map(|a| {
                assert_eq!(a.tag, VALUE_TAG_ENUM);
                i32::from_be_bytes(a.value[..].try_into().unwrap())
            })
            .collect();
        assert_eq!(ops, vec![0x02, 0x04, 0x0B]);

        let formats: Vec<&[u8]> = attrs[7..10].iter().map(|a| &a.value[..]).collect();
        let expected: Vec<&[u8]> = vec![&b"application/pdf"[..], &b"image/jpeg"[..], &b"image/png"[..]];
        assert_eq!(formats, expected);
        assert!(attrs[7..10].iter().all(|a| a.tag == VALUE_TAG_MIME_MEDIA_TYPE));

        assert_eq!(attrs[10].tag, VALUE_TAG_BOOLEAN);
        assert_eq!(attrs[10].value, vec![0x01]);

        assert_eq!(attrs[11].tag, VALUE_TAG_RESOLUTION);
        assert_eq!(
            attrs[11].value,
            vec![0x00, 0x00, 0x01, 0x2C, 0x00, 0x00, 0x01, 0x2C, 0x03]
        );
    }

    #[test]
    fn print_job_accepted_exact_bytes() {
        let resp = encode_print_job_accepted(7, JobId(0x0102));
        let mut expected = vec![0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, TAG_JOB_ATTRIBUTES];
        expected.extend_from_slice(&[VALUE_TAG_INTEGER, 0x00, 0x06]);
        expected.extend_from_slice(b"job-id");
        expected.extend_from_slice(&[0x00, 0x04, 0x00, 0x00, 0x01, 0x02]);
        expected.extend_from_slice(&[VALUE_TAG_ENUM, 0x00, 0x09]);
        expected.extend_from_slice(b"job-state");
        expected.extend_from_slice(&[0x00, 0x04, 0x00, 0x00, 0x00, 0x03]);
        expected.push(TAG_END_OF_ATTRIBUTES);
        assert_eq!(resp, expected);
    }

    #[test]
    fn validate_and_error_responses_have_no_body() {
        assert_eq!(
            encode_validate_job_ok(0xDEAD_BEEF),
            vec![0x01, 0x01, 0x00, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0x03]
        );
        assert_eq!(
            encode_error(5, STATUS_OPERATION_NOT_SUPPORTED),
            vec![0x01, 0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x05, 0x03]
        );
    }

    #[test]
    fn response_headers_survive_decoding() {
        let cases: [(Vec<u8>, u16); 4] = [
            (encode_get_printer_attributes(11, "ipp://h:1/ipp/print", "p"), STATUS_OK),
            (encode_print_job_accepted(12, JobId(3)), STATUS_OK),
            (encode_validate_job_ok(13), STATUS_OK),
            (encode_error(14, STATUS_OPERATION_NOT_SUPPORTED), STATUS_OPERATION_NOT_SUPPORTED),
        ];
        for (i, (bytes, status)) in cases.into_iter().enumerate() {
            let header = IppHeader::parse(&bytes).unwrap();
            assert_eq!(header.version, IPP_VERSION);
            assert_eq!(header.code, status);
            assert_eq!(header.request_id, 11 + i as u32);
        }
    }

    #[test]
    fn additional_values_have_zero_name_length() {
        let mut builder = IppResponseBuilder::new(STATUS_OK, 1);
        builder
            .begin_group(TAG_PRINTER_ATTRIBUTES)
            .keyword("sides-supported", "one-sided")
            .additional(VALUE_TAG_KEYWORD, b"two-sided-long-edge");
        let bytes = builder.build();

        let (groups, _) = walk(&bytes);
        let attrs = &groups[0].attributes;
        assert_eq!(attrs[0].name, "sides-supported");
        assert_eq!(attrs[1].name, "");
        assert_eq!(attrs[1].value, b"two-sided-long-edge");
    }
}
