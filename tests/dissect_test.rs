//! Keyed text, dig block, and whole-chunk dissection.

use dns_sift::dissect::{
    ExchangeDissector, ExchangeKind, KeyedTextParser, MetaValue, ResponseBlockParser,
};
use dns_sift::DissectError;

const DIG_BLOCK: &str = ";; ->>HEADER<<- opcode: QUERY, rcode: NOERROR, id: 28048
;; flags: qr aa; QUERY: 1, ANSWER: 1, AUTHORITY: 2, ADDITIONAL: 2

;; QUESTION SECTION:
;130.152.91.195.in-addr.arpa. IN PTR

;; ANSWER SECTION:
130.152.91.195.in-addr.arpa. 86400 IN PTR h-195.ln.rinet.ru.

;; AUTHORITY SECTION:
152.91.195.in-addr.arpa. 86400 IN NS ns.rinet.ru.
152.91.195.in-addr.arpa. 86400 IN NS ns.cronyx.ru.

;; ADDITIONAL SECTION:
ns.rinet.ru. 864000 IN A 195.54.192.33
ns.cronyx.ru. 86400 IN A 158.250.0.62
";

const REQUEST_CHUNK: &str = "
    query_ip: 37.9.72.211
    id: 19254
    qname: 221.160.5.15.in-addr.arpa.
    qtype: PTR (12)
    query: [43 octets]
    ;; ->>HEADER<<- opcode: QUERY, rcode: NOERROR, id: 19254
    ;; flags:; QUERY: 1, ANSWER: 0, AUTHORITY: 0, ADDITIONAL: 0

    ;; QUESTION SECTION:
    ;221.160.5.15.in-addr.arpa. IN PTR

    ;; ANSWER SECTION:

    ;; AUTHORITY SECTION:

    ;; ADDITIONAL SECTION:
    ";

const RESPONSE_CHUNK: &str = "
response: [53 octets]
;; ->>HEADER<<- opcode: QUERY, rcode: NOERROR, id: 61168
;; flags: qr aa; QUERY: 1, ANSWER: 1, AUTHORITY: 0, ADDITIONAL: 0

;; QUESTION SECTION:
;rosfirm.ru. IN A

;; ANSWER SECTION:
rosfirm.ru. 86400 IN A 212.23.90.34

;; AUTHORITY SECTION:

;; ADDITIONAL SECTION:
";

#[test]
fn keyed_parser_splits_lines() {
    let map = KeyedTextParser::meta()
        .parse("type: UDP_QUERY_RESPONSE\nquery_ip: 144.82.39.72\nresponse_ip: 46.51.185.157\n")
        .unwrap();
    assert_eq!(map.get("type").map(String::as_str), Some("UDP_QUERY_RESPONSE"));
    assert_eq!(map.get("query_ip").map(String::as_str), Some("144.82.39.72"));
    assert_eq!(map.get("response_ip").map(String::as_str), Some("46.51.185.157"));
    assert_eq!(map.keys().collect::<Vec<_>>(), ["type", "query_ip", "response_ip"]);
}

#[test]
fn keyed_parser_strips_keys_and_values() {
    let map = KeyedTextParser::meta()
        .parse(" qclass : IN (1)  \n qtype:   TXT (16)\nrcode :  NXDOMAIN (3) \n")
        .unwrap();
    assert_eq!(map.get("qclass").map(String::as_str), Some("IN (1)"));
    assert_eq!(map.get("qtype").map(String::as_str), Some("TXT (16)"));
    assert_eq!(map.get("rcode").map(String::as_str), Some("NXDOMAIN (3)"));
}

#[test]
fn keyed_parser_keeps_colons_in_meta_values() {
    let map = KeyedTextParser::meta().parse("query_ip: 2001:db8::1\n").unwrap();
    assert_eq!(map.get("query_ip").map(String::as_str), Some("2001:db8::1"));
}

#[test]
fn keyed_parser_skips_lines_without_separator() {
    let map = KeyedTextParser::default()
        .parse("just text\n\n   \nkey: value\n")
        .unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("key").map(String::as_str), Some("value"));
}

#[test]
fn keyed_parser_empty_is_success_unless_required() {
    let optional = KeyedTextParser::default().parse("nothing here");
    assert!(optional.is_some_and(|m| m.is_empty()));
    assert!(KeyedTextParser::meta().parse("nothing here").is_none());
}

#[test]
fn keyed_parser_last_write_wins() {
    let map = KeyedTextParser::default().parse("id: 1\nother: x\nid: 2\n").unwrap();
    assert_eq!(map.get("id").map(String::as_str), Some("2"));
    assert_eq!(map.keys().collect::<Vec<_>>(), ["id", "other"]);
}

#[test]
fn pair_parser_splits_on_first_separator_only() {
    let map = KeyedTextParser::pairs()
        .parse_items("id: 4242, weird: a: b".split(','))
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("weird").map(String::as_str), Some("a: b"));
}

#[test]
fn wider_split_drops_items_with_extra_separators() {
    let map = KeyedTextParser::new(':', 2)
        .parse_items("id: 4242, weird: a: b".split(','))
        .unwrap();
    assert_eq!(map.len(), 1);
    assert!(map.get("weird").is_none());
}

#[test]
fn dig_block_dissects_all_sections() {
    let block = ResponseBlockParser::new().parse(DIG_BLOCK).unwrap();

    assert_eq!(block.header.get("opcode").map(String::as_str), Some("QUERY"));
    assert_eq!(block.header.get("rcode").map(String::as_str), Some("NOERROR"));
    assert_eq!(block.header.get("id").map(String::as_str), Some("28048"));

    assert_eq!(block.flags.get("flags").map(String::as_str), Some("qr aa"));
    assert_eq!(block.flags.get("QUERY").map(String::as_str), Some("1"));
    assert_eq!(block.flags.get("ANSWER").map(String::as_str), Some("1"));
    assert_eq!(block.flags.get("AUTHORITY").map(String::as_str), Some("2"));
    assert_eq!(block.flags.get("ADDITIONAL").map(String::as_str), Some("2"));

    assert_eq!(block.question_section, ";130.152.91.195.in-addr.arpa. IN PTR");
    assert_eq!(
        block.answer_section,
        "130.152.91.195.in-addr.arpa. 86400 IN PTR h-195.ln.rinet.ru."
    );
    assert_eq!(
        block.authority_section,
        "152.91.195.in-addr.arpa. 86400 IN NS ns.rinet.ru.\n152.91.195.in-addr.arpa. 86400 IN NS ns.cronyx.ru."
    );
    assert_eq!(
        block.additional_section,
        "ns.rinet.ru. 864000 IN A 195.54.192.33\nns.cronyx.ru. 86400 IN A 158.250.0.62"
    );
    assert!(block.other_sections.is_empty());
}

#[test]
fn dig_block_without_additional_section_is_accepted() {
    let text = ";; ->>HEADER<<- opcode: QUERY, rcode: NOERROR, id: 1
;; flags: qr; QUERY: 1, ANSWER: 0, AUTHORITY: 0, ADDITIONAL: 0
;; QUESTION SECTION:
;a. IN A
;; ANSWER SECTION:
;; AUTHORITY SECTION:
";
    let block = ResponseBlockParser::new().parse(text).unwrap();
    assert_eq!(block.question_section, ";a. IN A");
    assert_eq!(block.additional_section, "");
}

#[test]
fn dig_block_keeps_nonstandard_sections() {
    let text = ";; ->>HEADER<<- opcode: QUERY, rcode: NOERROR, id: 7
;; flags: qr rd; QUERY: 1, ANSWER: 0, AUTHORITY: 0, ADDITIONAL: 1
;; OPT PSEUDOSECTION:
; EDNS: version: 0, flags:; udp: 4096
;; QUESTION SECTION:
;a. IN A
;; ANSWER SECTION:
";
    let block = ResponseBlockParser::new().parse(text).unwrap();
    assert_eq!(
        block.other_sections.get("opt_pseudosection").map(String::as_str),
        Some("; EDNS: version: 0, flags:; udp: 4096")
    );
    assert_eq!(block.question_section, ";a. IN A");
}

#[test]
fn dig_block_structural_failures() {
    let parser = ResponseBlockParser::new();
    assert_eq!(
        parser.parse(";; ->>HEADER<<- id: 1\n;; flags: qr; QUERY: 1\n"),
        Err(DissectError::Structural { found: 2, expected: 5 })
    );

    let bad_header = ";; HEADER id 1\n;; flags: qr; QUERY: 1\n;; A:\n;; B:\n;; C:\n";
    assert!(matches!(parser.parse(bad_header), Err(DissectError::Header(_))));

    let bad_flags = ";; ->>HEADER<<- id: 1\n;; flags qr\n;; A:\n;; B:\n;; C:\n";
    assert!(matches!(parser.parse(bad_flags), Err(DissectError::Flags(_))));
}

#[test]
fn dissect_request() {
    let record = ExchangeDissector::new().dissect(REQUEST_CHUNK).unwrap();

    assert_eq!(record.id, "19254");
    assert_eq!(record.kind, ExchangeKind::Request);
    assert_eq!(record.meta.get("query"), Some(&MetaValue::Octets(43)));
    assert_eq!(
        record.meta.get("qname"),
        Some(&MetaValue::from("221.160.5.15.in-addr.arpa."))
    );
    assert_eq!(record.meta.get("qtype"), Some(&MetaValue::from("PTR (12)")));
    assert_eq!(record.query_ip(), Some("37.9.72.211"));

    assert_eq!(record.packet.flags.get("flags").map(String::as_str), Some(""));
    assert_eq!(record.packet.flags.get("QUERY").map(String::as_str), Some("1"));
    assert_eq!(record.packet.question_section, ";221.160.5.15.in-addr.arpa. IN PTR");
    assert_eq!(record.packet.answer_section, "");
}

#[test]
fn dissect_response() {
    let record = ExchangeDissector::new().dissect(RESPONSE_CHUNK).unwrap();

    assert_eq!(record.id, "61168");
    assert_eq!(record.kind, ExchangeKind::Response);
    assert_eq!(record.meta.get("response"), Some(&MetaValue::Octets(53)));
    assert_eq!(record.meta.len(), 1);
    assert_eq!(record.query_ip(), None);
    assert_eq!(record.packet.answer_section, "rosfirm.ru. 86400 IN A 212.23.90.34");
}

#[test]
fn dissect_leaves_non_octet_sizes_as_text() {
    let chunk = RESPONSE_CHUNK.replace("[53 octets]", "[215 bytes]");
    let record = ExchangeDissector::new().dissect(&chunk).unwrap();
    assert_eq!(record.meta.get("response"), Some(&MetaValue::from("[215 bytes]")));
    assert_eq!(record.kind, ExchangeKind::Response);
}

#[test]
fn dissect_without_marker_fails() {
    let result = ExchangeDissector::new().dissect("This is pretty unexpected\npiece of the text.");
    assert_eq!(result, Err(DissectError::MissingMarker));

    let result = ExchangeDissector::new()
        .dissect("type: UDP_QUERY_RESPONSE\nquery_ip: 144.82.39.72\nresponse_ip: 46.51.185.157");
    assert_eq!(result, Err(DissectError::MissingMarker));
}

#[test]
fn dissect_without_meta_is_partial() {
    let chunk = RESPONSE_CHUNK.replace("response: [53 octets]", "");
    assert_eq!(
        ExchangeDissector::new().dissect(&chunk),
        Err(DissectError::PartialDissection)
    );
}

#[test]
fn dissect_unclassified_exchange() {
    let chunk = RESPONSE_CHUNK.replace("response: [53 octets]", "proto: TCP");
    assert_eq!(
        ExchangeDissector::new().dissect(&chunk),
        Err(DissectError::UnclassifiedExchange)
    );
}

#[test]
fn dissect_missing_identifier() {
    let chunk = RESPONSE_CHUNK.replace(", id: 61168", "");
    assert_eq!(
        ExchangeDissector::new().dissect(&chunk),
        Err(DissectError::MissingIdentifier)
    );
}

#[test]
fn record_projection_exposes_meta_and_packet() {
    let record = ExchangeDissector::new().dissect(REQUEST_CHUNK).unwrap();
    let value = record.to_value();
    assert_eq!(value.lookup_str(&["meta", "qname"]), Ok("221.160.5.15.in-addr.arpa."));
    assert_eq!(value.lookup_f64(&["meta", "query"]), Ok(43.0));
    assert_eq!(value.lookup_str(&["packet", "header", "rcode"]), Ok("NOERROR"));
    assert_eq!(value.lookup_str(&["type"]), Ok("REQUEST"));
    assert!(value.lookup(&["meta", "response"]).is_err());
}
