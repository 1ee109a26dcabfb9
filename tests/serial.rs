mod common;

use common::{ScriptedPort, TEST_POLL_LIMIT, transport};
use fwshell::serial::prelude::*;
use fwshell::serial::{Error, LineBuffer, Transport, read_line};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_newline_expanded_on_write() {
    let mut transport = transport(b"");
    transport.write_str("a\nb\n").unwrap();
    assert_eq!(transport.port().output, b"a\r\nb\r\n");
}

#[test]
fn test_write_raw_is_untranslated() {
    let mut transport = transport(b"");
    transport.write_raw(b'\n').unwrap();
    assert_eq!(transport.port().output, b"\n");
}

#[test]
fn test_carriage_return_folded_on_read() {
    let mut transport = transport(b"x\r\n");
    assert_eq!(transport.read_byte(), Ok(b'x'));
    assert_eq!(transport.read_byte(), Ok(b'\n'));
    assert_eq!(transport.read_byte(), Ok(b'\n'));
}

#[test]
fn test_echo_mode() {
    let mut transport = transport(b"hi\r");
    assert!(!transport.echo());
    transport.set_echo(true);
    assert!(transport.echo());

    for _ in 0..3 {
        transport.read_byte().unwrap();
    }
    assert_eq!(transport.port().output, b"hi\r\n");
}

#[test]
fn test_echo_off_writes_nothing() {
    let mut transport = transport(b"quiet\n");
    let mut buf = [0u8; 16];
    read_line(&mut transport, &mut buf).unwrap();
    assert!(transport.port().output.is_empty());
}

#[test]
fn test_read_times_out_with_poll_limit() {
    let mut transport = transport(b"");
    assert_eq!(transport.read_byte(), Err(Error::Timeout));
    assert_eq!(transport.port().read_polls, TEST_POLL_LIMIT as usize + 1);
}

#[test]
fn test_write_waits_for_busy_port() {
    let mut port = ScriptedPort::new();
    port.busy_writes = 3;
    let mut transport = Transport::new(port);
    transport.set_poll_limit(Some(TEST_POLL_LIMIT));
    transport.write_byte(b'!').unwrap();
    assert_eq!(transport.into_inner().output, b"!");
}

#[test]
fn test_write_times_out_on_stuck_port() {
    let mut port = ScriptedPort::new();
    port.busy_writes = usize::MAX;
    let mut transport = Transport::new(port);
    transport.set_poll_limit(Some(2));
    assert_eq!(transport.poll_limit(), Some(2));
    assert_eq!(transport.write_byte(b'x'), Err(Error::Timeout));
}

#[test]
fn test_unbounded_by_default() {
    let transport = Transport::new(ScriptedPort::new());
    assert_eq!(transport.poll_limit(), None);
    assert!(transport.echo());
}

#[test]
fn test_vec_sink() {
    let mut sink: heapless::Vec<u8, 4> = heapless::Vec::new();
    sink.write_str("ab\n").unwrap();
    assert_eq!(&sink[..], b"ab\n");
    assert_eq!(sink.write_str("cd"), Err(Error::BufferFull));
}

#[test]
fn test_read_line_stops_after_newline() {
    let mut transport = transport(b"help\nnext\n");
    let mut buf = [0xaau8; 16];
    assert_eq!(read_line(&mut transport, &mut buf), Ok(5));
    assert_eq!(&buf[..6], b"help\n\0");

    assert_eq!(read_line(&mut transport, &mut buf), Ok(5));
    assert_eq!(&buf[..6], b"next\n\0");
}

#[test]
fn test_read_line_full_buffer() {
    let mut transport = transport(b"abcdefgh\n");
    let mut buf = [0u8; 4];
    assert_eq!(read_line(&mut transport, &mut buf), Ok(3));
    assert_eq!(&buf, b"abc\0");
    assert_eq!(read_line(&mut transport, &mut buf), Ok(3));
    assert_eq!(&buf, b"def\0");
    assert_eq!(read_line(&mut transport, &mut buf), Ok(3));
    assert_eq!(&buf, b"gh\n\0");
}

#[test]
fn test_read_line_degenerate_buffers() {
    let mut transport = transport(b"x\n");
    assert_eq!(read_line(&mut transport, &mut []), Ok(0));

    let mut one = [0xffu8; 1];
    assert_eq!(read_line(&mut transport, &mut one), Ok(0));
    assert_eq!(one, [0]);

    // Nothing was consumed.
    assert_eq!(transport.port().input.len(), 2);
}

#[test]
fn test_read_line_terminates_on_timeout() {
    let mut transport = transport(b"par");
    let mut buf = [0xffu8; 8];
    assert_eq!(read_line(&mut transport, &mut buf), Err(Error::Timeout));
    assert_eq!(&buf[..4], b"par\0");
}

#[test]
fn test_line_buffer() {
    let mut transport = transport(b"echo hi\nabcdefgh");
    let mut line: LineBuffer<16> = LineBuffer::new();
    assert!(line.is_empty());
    assert!(!line.is_complete());

    assert_eq!(line.fill(&mut transport), Ok(8));
    assert_eq!(line.as_bytes(), b"echo hi\n");
    assert!(line.is_complete());
    assert_eq!(&*line.as_mut_bytes(), b"echo hi\n\0");

    line.set_capacity(4);
    assert_eq!(line.capacity(), 4);
    assert_eq!(line.fill(&mut transport), Ok(3));
    assert_eq!(line.as_bytes(), b"abc");
    assert!(!line.is_complete());
}

#[test]
fn test_line_buffer_capacity_clamped() {
    let line: LineBuffer<8> = LineBuffer::with_capacity(100);
    assert_eq!(line.capacity(), 8);
}

#[test]
fn test_read_line_random_input() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for _ in 0..500 {
        let len = rng.gen_range(0..64);
        let input: Vec<u8> = (0..len)
            .map(|_| if rng.gen_bool(0.1) { b'\n' } else { rng.gen_range(0x20..0x7f) })
            .collect();
        let capacity = rng.gen_range(1..24);

        let mut transport = transport(&input);
        let mut buf = vec![0xffu8; capacity];
        let mut consumed = 0;
        loop {
            match read_line(&mut transport, &mut buf) {
                Ok(n) => {
                    assert!(n < capacity);
                    assert_eq!(buf[n], 0);
                    assert_eq!(&buf[..n], &input[consumed..consumed + n]);
                    let newline_at = buf[..n].iter().position(|&b| b == b'\n');
                    assert!(newline_at.is_none() || newline_at == Some(n - 1));
                    assert!(n == capacity - 1 || buf[..n].ends_with(b"\n"));
                    consumed += n;
                    if n == 0 {
                        break;
                    }
                }
                Err(e) => {
                    assert_eq!(e, Error::Timeout);
                    let n = buf.iter().position(|&b| b == 0).unwrap();
                    consumed += n;
                    break;
                }
            }
        }
        assert!(capacity == 1 || consumed == input.len());
    }
}
