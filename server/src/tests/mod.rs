/*
 * Created on Sat Apr 12 2025
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

//! # End-to-end wire tests
//!
//! These run a real [`ConnectionHandler`] over in-memory duplex pipes: the
//! test side plays the client, writing command frames and asserting the
//! exact reply bytes. Everything between the socket and the keyspace is
//! exercised, the TCP accept loop being the only part swapped out.

#[macro_use]
mod macros;

use {
    crate::{
        corestore::{clock::mock::MockClock, Corestore},
        dbnet::{connection::Connection, BufferedSocketStream, ConnectionHandler},
    },
    std::{sync::Arc, time::Duration},
    tokio::{
        io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream},
        sync::{broadcast, mpsc, Semaphore},
        time::sleep,
    },
};

impl BufferedSocketStream for DuplexStream {}

/// A miniature server: every [`TestServer::connect`] spawns a real
/// connection handler against the shared corestore
struct TestServer {
    db: Corestore,
    signal: broadcast::Sender<()>,
    terminate_tx: mpsc::Sender<()>,
    climit: Arc<Semaphore>,
}

impl TestServer {
    fn new(db: Corestore) -> Self {
        let (signal, _) = broadcast::channel(1);
        let (terminate_tx, _) = mpsc::channel(1);
        Self {
            db,
            signal,
            terminate_tx,
            climit: Arc::new(Semaphore::new(0)),
        }
    }
    fn with_system_clock() -> Self {
        Self::new(Corestore::new_system())
    }
    fn connect(&self) -> DuplexStream {
        let (client, served) = duplex(libcoral::BUF_CAP);
        let mut chandle = ConnectionHandler::new(
            self.db.clone(),
            Connection::new(served),
            self.climit.clone(),
            self.signal.subscribe(),
            self.terminate_tx.clone(),
        );
        tokio::spawn(async move {
            let _ = chandle.run().await;
        });
        client
    }
}

#[tokio::test]
async fn ping() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*1\r\n$4\r\nPING\r\n" => b"+PONG\r\n");
    // the optional argument is ignored
    assert_wire!(con, b"*2\r\n$4\r\nPING\r\n$2\r\nhi\r\n" => b"+PONG\r\n");
}

#[tokio::test]
async fn echo() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n" => b"$3\r\nhey\r\n");
}

#[tokio::test]
async fn set_get_and_missing() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n" => b"+OK\r\n");
    assert_wire!(con, b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n" => b"$3\r\nbar\r\n");
    assert_wire!(con, b"*2\r\n$3\r\nGET\r\n$7\r\nmissing\r\n" => b"$-1\r\n");
}

#[tokio::test]
async fn set_with_expiry_dies_on_schedule() {
    let clock = Arc::new(MockClock::start_at(1_000));
    let server = TestServer::new(Corestore::new(clock.clone()));
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nPX\r\n$3\r\n100\r\n" => b"+OK\r\n"
    );
    assert_wire!(con, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n" => b"$1\r\nv\r\n");
    clock.advance(150);
    assert_wire!(con, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n" => b"$-1\r\n");
    assert_wire!(con, b"*2\r\n$4\r\nTYPE\r\n$1\r\nk\r\n" => b"+none\r\n");
}

#[tokio::test]
async fn set_option_errors() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nEX\r\n$3\r\n100\r\n" => b"-ERR syntax error\r\n"
    );
    assert_wire!(
        con,
        b"*4\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nPX\r\n" => b"-ERR syntax error\r\n"
    );
    assert_wire!(
        con,
        b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nPX\r\n$3\r\nabc\r\n" => b"-ERR invalid expire time in 'set' command\r\n"
    );
    assert_wire!(
        con,
        b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nPX\r\n$2\r\n-5\r\n" => b"-ERR invalid expire time in 'set' command\r\n"
    );
}

#[tokio::test]
async fn list_basics() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*5\r\n$5\r\nRPUSH\r\n$4\r\nlist\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n" => b":3\r\n"
    );
    assert_wire!(
        con,
        b"*4\r\n$6\r\nLRANGE\r\n$4\r\nlist\r\n$1\r\n0\r\n$2\r\n-1\r\n" => b"*3\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n"
    );
    assert_wire!(con, b"*2\r\n$4\r\nLPOP\r\n$4\r\nlist\r\n" => b"$1\r\na\r\n");
    assert_wire!(con, b"*2\r\n$4\r\nLLEN\r\n$4\r\nlist\r\n" => b":2\r\n");
    assert_wire!(con, b"*2\r\n$4\r\nTYPE\r\n$4\r\nlist\r\n" => b"+list\r\n");
}

#[tokio::test]
async fn lpush_makes_the_last_value_the_head() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*5\r\n$5\r\nLPUSH\r\n$4\r\nlist\r\n$1\r\nx\r\n$1\r\ny\r\n$1\r\nz\r\n" => b":3\r\n"
    );
    assert_wire!(
        con,
        b"*4\r\n$6\r\nLRANGE\r\n$4\r\nlist\r\n$1\r\n0\r\n$2\r\n-1\r\n" => b"*3\r\n$1\r\nz\r\n$1\r\ny\r\n$1\r\nx\r\n"
    );
}

#[tokio::test]
async fn lpop_with_counts() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*5\r\n$5\r\nRPUSH\r\n$4\r\nnums\r\n$3\r\none\r\n$3\r\ntwo\r\n$5\r\nthree\r\n" => b":3\r\n"
    );
    assert_wire!(
        con,
        b"*3\r\n$4\r\nLPOP\r\n$4\r\nnums\r\n$1\r\n2\r\n" => b"*2\r\n$3\r\none\r\n$3\r\ntwo\r\n"
    );
    // a zero count never mutates
    assert_wire!(con, b"*3\r\n$4\r\nLPOP\r\n$4\r\nnums\r\n$1\r\n0\r\n" => b"*0\r\n");
    assert_wire!(con, b"*2\r\n$4\r\nLLEN\r\n$4\r\nnums\r\n" => b":1\r\n");
    // a missing key is an empty array with a count, a nil bulk without
    assert_wire!(con, b"*3\r\n$4\r\nLPOP\r\n$4\r\nnope\r\n$1\r\n5\r\n" => b"*0\r\n");
    assert_wire!(con, b"*2\r\n$4\r\nLPOP\r\n$4\r\nnope\r\n" => b"$-1\r\n");
    // a garbage count is an integer error
    assert_wire!(
        con,
        b"*3\r\n$4\r\nLPOP\r\n$4\r\nnums\r\n$1\r\nx\r\n" => b"-ERR value is not an integer or out of range\r\n"
    );
}

#[tokio::test(start_paused = true)]
async fn blpop_rendezvous_between_connections() {
    let server = TestServer::with_system_clock();
    let mut alice = server.connect();
    let mut bob = server.connect();
    alice
        .write_all(b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$1\r\n0\r\n")
        .await
        .unwrap();
    // give the waiter time to park
    sleep(Duration::from_millis(10)).await;
    assert_wire!(bob, b"*3\r\n$5\r\nRPUSH\r\n$1\r\nq\r\n$5\r\nhello\r\n" => b":1\r\n");
    let expect = b"*2\r\n$1\r\nq\r\n$5\r\nhello\r\n";
    let mut ret = vec![0u8; expect.len()];
    alice.read_exact(&mut ret).await.unwrap();
    assert_eq!(ret.as_slice(), &expect[..]);
    // the rendezvous consumed the push
    assert_wire!(bob, b"*2\r\n$4\r\nLLEN\r\n$1\r\nq\r\n" => b":0\r\n");
}

#[tokio::test(start_paused = true)]
async fn blpop_times_out_with_a_nil_array() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*3\r\n$5\r\nBLPOP\r\n$6\r\nabsent\r\n$3\r\n0.1\r\n" => b"*-1\r\n"
    );
}

#[tokio::test]
async fn blpop_timeout_errors() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$3\r\nabc\r\n" => b"-ERR timeout is not a float or out of range\r\n"
    );
    assert_wire!(
        con,
        b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$2\r\n-1\r\n" => b"-ERR timeout is negative\r\n"
    );
}

#[tokio::test]
async fn operations_against_the_wrong_kind() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*3\r\n$3\r\nSET\r\n$1\r\ns\r\n$1\r\n1\r\n" => b"+OK\r\n");
    assert_wire!(
        con,
        b"*3\r\n$5\r\nRPUSH\r\n$1\r\ns\r\n$1\r\nx\r\n" => b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n"
    );
    assert_wire!(
        con,
        b"*2\r\n$4\r\nLPOP\r\n$1\r\ns\r\n" => b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n"
    );
}

#[tokio::test]
async fn xadd_ids_and_kinds() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*5\r\n$4\r\nXADD\r\n$2\r\nst\r\n$3\r\n0-1\r\n$1\r\nt\r\n$2\r\n36\r\n" => b"$3\r\n0-1\r\n"
    );
    assert_wire!(
        con,
        b"*5\r\n$4\r\nXADD\r\n$2\r\nst\r\n$3\r\n0-1\r\n$1\r\nt\r\n$2\r\n37\r\n" => b"-ERR The ID specified in XADD is equal or smaller than the target stream top item\r\n"
    );
    assert_wire!(con, b"*2\r\n$4\r\nTYPE\r\n$2\r\nst\r\n" => b"+stream\r\n");
    assert_wire!(
        con,
        b"*5\r\n$4\r\nXADD\r\n$2\r\nst\r\n$3\r\n0-0\r\n$1\r\nt\r\n$1\r\nv\r\n" => b"-ERR The ID specified in XADD must be greater than 0-0\r\n"
    );
    // the auto-sequence form continues from the top entry
    assert_wire!(
        con,
        b"*5\r\n$4\r\nXADD\r\n$2\r\nst\r\n$3\r\n0-*\r\n$1\r\nt\r\n$2\r\n38\r\n" => b"$3\r\n0-2\r\n"
    );
    assert_wire!(
        con,
        b"*5\r\n$4\r\nXADD\r\n$2\r\nst\r\n$4\r\noops\r\n$1\r\nt\r\n$1\r\nv\r\n" => b"-ERR Invalid stream ID specified\r\n"
    );
    // an odd field/value tail is an arity error
    assert_wire!(
        con,
        b"*4\r\n$4\r\nXADD\r\n$2\r\nst\r\n$3\r\n1-1\r\n$1\r\nt\r\n" => b"-ERR wrong number of arguments for 'xadd' command\r\n"
    );
}

#[tokio::test]
async fn flushdb_empties_the_keyspace() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n" => b"+OK\r\n");
    assert_wire!(con, b"*3\r\n$5\r\nRPUSH\r\n$1\r\nl\r\n$1\r\nx\r\n" => b":1\r\n");
    assert_wire!(con, b"*1\r\n$7\r\nFLUSHDB\r\n" => b"+OK\r\n");
    assert_wire!(con, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n" => b"$-1\r\n");
    assert_wire!(con, b"*2\r\n$4\r\nTYPE\r\n$1\r\nl\r\n" => b"+none\r\n");
}

#[tokio::test]
async fn command_names_are_case_insensitive() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*1\r\n$4\r\nping\r\n" => b"+PONG\r\n");
    assert_wire!(con, b"*3\r\n$3\r\nsEt\r\n$1\r\nk\r\n$1\r\nv\r\n" => b"+OK\r\n");
    assert_wire!(con, b"*2\r\n$3\r\ngEt\r\n$1\r\nk\r\n" => b"$1\r\nv\r\n");
}

#[tokio::test]
async fn unknown_commands_and_arity() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(con, b"*1\r\n$4\r\nBOOP\r\n" => b"-ERR unknown command 'BOOP'\r\n");
    assert_wire!(
        con,
        b"*1\r\n$3\r\nGET\r\n" => b"-ERR wrong number of arguments for 'get' command\r\n"
    );
    // errors do not kill the connection
    assert_wire!(con, b"*1\r\n$4\r\nPING\r\n" => b"+PONG\r\n");
}

#[tokio::test]
async fn pipelined_frames_reply_in_order() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    // two frames in one write: two replies, same order
    con.write_all(b"*1\r\n$4\r\nPING\r\n*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n")
        .await
        .unwrap();
    let expect = b"+PONG\r\n$2\r\nhi\r\n";
    let mut ret = vec![0u8; expect.len()];
    con.read_exact(&mut ret).await.unwrap();
    assert_eq!(ret.as_slice(), &expect[..]);
}

#[tokio::test]
async fn values_are_binary_safe() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    assert_wire!(
        con,
        b"*3\r\n$3\r\nSET\r\n$3\r\nbin\r\n$4\r\n\x00\xff\r\n\r\n" => b"+OK\r\n"
    );
    assert_wire!(con, b"*2\r\n$3\r\nGET\r\n$3\r\nbin\r\n" => b"$4\r\n\x00\xff\r\n\r\n");
}

#[tokio::test]
async fn the_keyspace_is_shared_between_connections() {
    let server = TestServer::with_system_clock();
    let mut writer = server.connect();
    let mut reader = server.connect();
    assert_wire!(writer, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n" => b"+OK\r\n");
    assert_wire!(reader, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n" => b"$1\r\nv\r\n");
}

#[tokio::test(start_paused = true)]
async fn blpop_waiters_wake_in_arrival_order() {
    let server = TestServer::with_system_clock();
    let mut alice = server.connect();
    let mut bob = server.connect();
    let mut carol = server.connect();
    alice
        .write_all(b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$1\r\n0\r\n")
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;
    bob.write_all(b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$1\r\n0\r\n")
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;
    // one push with two values serves both suspended clients, oldest first
    assert_wire!(
        carol,
        b"*4\r\n$5\r\nRPUSH\r\n$1\r\nq\r\n$5\r\nfirst\r\n$6\r\nsecond\r\n" => b":2\r\n"
    );
    let expect_alice = b"*2\r\n$1\r\nq\r\n$5\r\nfirst\r\n";
    let mut ret = vec![0u8; expect_alice.len()];
    alice.read_exact(&mut ret).await.unwrap();
    assert_eq!(ret.as_slice(), &expect_alice[..]);
    let expect_bob = b"*2\r\n$1\r\nq\r\n$6\r\nsecond\r\n";
    let mut ret = vec![0u8; expect_bob.len()];
    bob.read_exact(&mut ret).await.unwrap();
    assert_eq!(ret.as_slice(), &expect_bob[..]);
    assert_wire!(carol, b"*2\r\n$4\r\nLLEN\r\n$1\r\nq\r\n" => b":0\r\n");
}

#[tokio::test]
async fn lrange_edges_on_the_wire() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    // a missing key is an empty array
    assert_wire!(
        con,
        b"*4\r\n$6\r\nLRANGE\r\n$4\r\nnope\r\n$1\r\n0\r\n$2\r\n-1\r\n" => b"*0\r\n"
    );
    // non-integer indices are integer errors
    assert_wire!(
        con,
        b"*4\r\n$6\r\nLRANGE\r\n$4\r\nnope\r\n$1\r\nx\r\n$2\r\n-1\r\n" => b"-ERR value is not an integer or out of range\r\n"
    );
}

#[tokio::test]
async fn a_protocol_error_closes_the_connection() {
    let server = TestServer::with_system_clock();
    let mut con = server.connect();
    // inline commands don't exist here: 'P' is no type symbol
    con.write_all(b"PING\r\n").await.unwrap();
    let expect = b"-ERR Protocol error\r\n";
    let mut ret = vec![0u8; expect.len()];
    con.read_exact(&mut ret).await.unwrap();
    assert_eq!(ret.as_slice(), &expect[..]);
    // and then the server hangs up
    assert_eq!(con.read(&mut [0u8; 1]).await.unwrap(), 0);
}
