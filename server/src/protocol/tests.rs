/*
 * Created on Sun Feb 16 2025
 *
 * This file is a part of Coral
 * Coral is a free and open-source in-memory data structure server that
 * speaks the Redis RESP2 protocol, written by Ishan Kapoor ("the Author")
 * with the vision to provide a small, predictable and easily auditable
 * caching and queueing layer
 *
 * Copyright (c) 2025, Ishan Kapoor <ishan@coraldb.io>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

use {
    super::{element::Element, ParseError, Parser},
    crate::corestore::Data,
};

const PING: &[u8] = b"*1\r\n$4\r\nPING\r\n";

#[test]
fn parse_a_simple_frame() {
    let (query, forward_by) = Parser::parse(PING).unwrap();
    assert_eq!(forward_by, PING.len());
    assert_eq!(query.args(), &[Data::from("PING")]);
}

#[test]
fn every_prefix_of_a_frame_needs_more_bytes() {
    for cut in 0..PING.len() {
        assert_eq!(
            Parser::parse(&PING[..cut]).unwrap_err(),
            ParseError::NotEnough,
            "prefix of {cut} bytes should not parse"
        );
    }
}

#[test]
fn a_pipelined_tail_is_left_untouched() {
    let mut buffer = PING.to_vec();
    buffer.extend_from_slice(b"*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n");
    let (query, forward_by) = Parser::parse(&buffer).unwrap();
    assert_eq!(query.args(), &[Data::from("PING")]);
    // exactly one frame consumed; the tail is byte-identical
    assert_eq!(&buffer[forward_by..], &buffer[PING.len()..]);
    let (query, _) = Parser::parse(&buffer[forward_by..]).unwrap();
    assert_eq!(query.args().len(), 2);
}

#[test]
fn arguments_are_arbitrary_bytes() {
    // an argument carrying CRLFs and a NUL: lengths rule, not content
    let frame = b"*2\r\n$4\r\nECHO\r\n$6\r\na\r\n\0\r\n\r\n";
    let (query, forward_by) = Parser::parse(frame).unwrap();
    assert_eq!(forward_by, frame.len());
    assert_eq!(
        query.args(),
        &[
            Data::from("ECHO"),
            Data::copy_from_slice(b"a\r\n\0\r\n"),
        ]
    );
}

#[test]
fn empty_bulk_arguments_are_legal() {
    let frame = b"*2\r\n$4\r\nECHO\r\n$0\r\n\r\n";
    let (query, _) = Parser::parse(frame).unwrap();
    assert_eq!(query.args()[1], Data::copy_from_slice(b""));
}

#[test]
fn unknown_type_symbol_is_fatal() {
    assert_eq!(
        Parser::parse(b"!3\r\nfoo\r\n").unwrap_err(),
        ParseError::UnexpectedByte
    );
}

#[test]
fn bad_lengths_are_fatal() {
    // a non-numeric length
    assert_eq!(
        Parser::parse(b"*x\r\n").unwrap_err(),
        ParseError::DatatypeParseFailure
    );
    // a negative length other than -1
    assert_eq!(
        Parser::parse(b"*1\r\n$-2\r\n").unwrap_err(),
        ParseError::UnexpectedByte
    );
}

#[test]
fn broken_bulk_terminators_are_fatal() {
    // the payload overruns its declared length
    assert_eq!(
        Parser::parse(b"*1\r\n$3\r\nabcd\r\n").unwrap_err(),
        ParseError::UnexpectedByte
    );
    // CR without LF inside a length line
    assert_eq!(
        Parser::parse(b"*1\rx$4\r\nPING\r\n").unwrap_err(),
        ParseError::UnexpectedByte
    );
}

#[test]
fn meaningless_command_frames_are_bad_packets() {
    // an empty array is no command
    assert_eq!(Parser::parse(b"*0\r\n").unwrap_err(), ParseError::BadPacket);
    // neither is a nil array
    assert_eq!(Parser::parse(b"*-1\r\n").unwrap_err(), ParseError::BadPacket);
    // a nil bulk cannot name or argue a command
    assert_eq!(
        Parser::parse(b"*1\r\n$-1\r\n").unwrap_err(),
        ParseError::BadPacket
    );
    // elements of a command must be bulk strings
    assert_eq!(
        Parser::parse(b"*1\r\n:42\r\n").unwrap_err(),
        ParseError::BadPacket
    );
}

// encoder tests

fn roundtrip(element: Element) {
    let encoded = element.encode();
    let (decoded, forward_by) = Parser::parse_element(&encoded).unwrap();
    assert_eq!(forward_by, encoded.len());
    assert_eq!(decoded, element);
}

#[test]
fn encode_decode_roundtrips() {
    roundtrip(Element::SimpleString("OK".to_owned()));
    roundtrip(Element::Error("ERR synthetic".to_owned()));
    roundtrip(Element::Integer(0));
    roundtrip(Element::Integer(42));
    roundtrip(Element::Integer(-42));
    roundtrip(Element::Integer(i64::MAX));
    roundtrip(Element::BulkString(Data::from("hello")));
    roundtrip(Element::BulkString(Data::copy_from_slice(b"\x00\xff\r\n")));
    roundtrip(Element::NilBulk);
    roundtrip(Element::NilArray);
    roundtrip(Element::Array(Vec::new()));
    roundtrip(Element::Array(vec![
        Element::BulkString(Data::from("q")),
        Element::BulkString(Data::from("hello")),
    ]));
    roundtrip(Element::Array(vec![
        Element::Integer(1),
        Element::Array(vec![Element::SimpleString("nested".to_owned())]),
        Element::NilBulk,
    ]));
}

#[test]
fn exact_wire_forms() {
    assert_eq!(Element::SimpleString("PONG".to_owned()).encode(), b"+PONG\r\n");
    assert_eq!(Element::Error("ERR oops".to_owned()).encode(), b"-ERR oops\r\n");
    assert_eq!(Element::Integer(-7).encode(), b":-7\r\n");
    assert_eq!(
        Element::BulkString(Data::from("bar")).encode(),
        b"$3\r\nbar\r\n"
    );
    assert_eq!(
        Element::Array(vec![
            Element::BulkString(Data::from("q")),
            Element::BulkString(Data::from("hello")),
        ])
        .encode(),
        b"*2\r\n$1\r\nq\r\n$5\r\nhello\r\n"
    );
}

#[test]
fn nil_sentinels_are_not_empty_values() {
    assert_eq!(Element::NilBulk.encode(), b"$-1\r\n");
    assert_eq!(Element::BulkString(Data::from("")).encode(), b"$0\r\n\r\n");
    assert_eq!(Element::NilArray.encode(), b"*-1\r\n");
    assert_eq!(Element::Array(Vec::new()).encode(), b"*0\r\n");
    assert_ne!(Element::NilBulk, Element::BulkString(Data::from("")));
    assert_ne!(Element::NilArray, Element::Array(Vec::new()));
}
