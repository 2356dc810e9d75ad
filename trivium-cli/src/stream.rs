//! Encrypt, decrypt and key generation over byte streams.
//!
//! The operations are parameterized over named sources, sinks and an RNG so
//! they can be driven by files, standard streams or test fixtures alike.
//! Streams are consumed strictly once, front to back; nothing here seeks.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use anyhow::{bail, Context, Result};
use log::info;
use rand_core::{CryptoRng, OsRng, RngCore};
use trivium::cipher::{KeyIvInit, StreamCipher};
use trivium::{Iv, Key, Trivium, IV_SIZE, KEY_SIZE};

use crate::args::{Cli, Mode};

const CHUNK_SIZE: usize = 8192;
const STDIO: &str = "-";

/// Dispatch one invocation.
pub fn run(cli: &Cli) -> Result<()> {
    match cli.mode {
        Mode::Encrypt | Mode::Decrypt => {
            let mut key_file = Source::open(&cli.key_file)?;
            let mut key = Key::default();
            key_file.read_full(&mut key, "key")?;

            let mut input = Source::open(&cli.input)?;
            let mut output = Sink::create(&cli.output)?;
            if cli.mode == Mode::Encrypt {
                encrypt(&key, &mut OsRng, &mut input, &mut output)
            } else {
                decrypt(&key, &mut input, &mut output)
            }
        }
        Mode::Genkey => genkey(&mut OsRng, &mut Sink::create(&cli.key_file)?),
    }
}

/// Encrypt `input` into `output`: a fresh random IV, then the XOR of the
/// plaintext with the keystream under (key, IV).
pub fn encrypt(
    key: &Key,
    rng: &mut (impl CryptoRng + RngCore),
    input: &mut Source,
    output: &mut Sink,
) -> Result<()> {
    let mut iv = Iv::default();
    rng.try_fill_bytes(&mut iv)
        .with_context(|| format!("error generating {} random bytes for IV", IV_SIZE))?;
    output.write_all(&iv)?;
    xor_stream(Trivium::new(key, &iv), input, output)
}

/// Decrypt `input` into `output`, reading the IV from the first 10 bytes.
pub fn decrypt(key: &Key, input: &mut Source, output: &mut Sink) -> Result<()> {
    let mut iv = Iv::default();
    input.read_full(&mut iv, "IV")?;
    xor_stream(Trivium::new(key, &iv), input, output)
}

/// Generate a new key and write it to the key sink.
pub fn genkey(rng: &mut (impl CryptoRng + RngCore), output: &mut Sink) -> Result<()> {
    let mut key = Key::default();
    rng.try_fill_bytes(&mut key)
        .with_context(|| format!("error generating {} random bytes for key", KEY_SIZE))?;
    output.write_all(&key)?;
    output.flush()?;
    info!("wrote new key to {}", output.name());
    Ok(())
}

/// XOR the remaining input bytes with the keystream and flush the result.
fn xor_stream(mut cipher: Trivium, input: &mut Source, output: &mut Sink) -> Result<()> {
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        cipher.apply_keystream(&mut buf[..n]);
        output.write_all(&buf[..n])?;
    }
    output.flush()
}

/// A named byte source; the name keeps diagnostics pointing at the right
/// file. Reads are deliberately unbuffered so that pulling a 10-byte key
/// off a shared stream never swallows bytes that belong to the payload.
pub struct Source {
    name: String,
    inner: Box<dyn Read>,
}

impl Source {
    /// Open a file for reading, with `-` meaning stdin.
    pub fn open(path: &str) -> Result<Self> {
        if path == STDIO {
            Ok(Self::from_reader("stdin", io::stdin()))
        } else {
            let file = File::open(path).with_context(|| format!("error opening {}", path))?;
            Ok(Self::from_reader(path, file))
        }
    }

    /// Wrap an arbitrary reader under a display name.
    pub fn from_reader(name: &str, reader: impl Read + 'static) -> Self {
        Self {
            name: name.into(),
            inner: Box::new(reader),
        }
    }

    /// Read up to `buf.len()` bytes, returning how many arrived.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner
            .read(buf)
            .with_context(|| format!("error reading from {}", self.name))
    }

    /// Read exactly `buf.len()` bytes of `what`, treating a short read as a
    /// hard error that reports how many bytes were actually available.
    fn read_full(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        let mut got = 0;
        while got < buf.len() {
            let n = self
                .inner
                .read(&mut buf[got..])
                .with_context(|| format!("error reading {} from {}", what, self.name))?;
            if n == 0 {
                break;
            }
            got += n;
        }
        if got != buf.len() {
            bail!(
                "only read {} bytes < {} of {} for {}",
                got,
                buf.len(),
                self.name,
                what
            );
        }
        Ok(())
    }
}

/// A named, buffered byte sink. Callers must [`Sink::flush`] before
/// reporting success.
pub struct Sink {
    name: String,
    inner: BufWriter<Box<dyn Write>>,
}

impl Sink {
    /// Create a file for writing, with `-` meaning stdout.
    pub fn create(path: &str) -> Result<Self> {
        if path == STDIO {
            Ok(Self::from_writer("stdout", io::stdout()))
        } else {
            let file = File::create(path).with_context(|| format!("error creating {}", path))?;
            Ok(Self::from_writer(path, file))
        }
    }

    /// Wrap an arbitrary writer under a display name.
    pub fn from_writer(name: &str, writer: impl Write + 'static) -> Self {
        Self {
            name: name.into(),
            inner: BufWriter::new(Box::new(writer)),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner
            .write_all(buf)
            .with_context(|| format!("error writing to {}", self.name))
    }

    fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .with_context(|| format!("error flushing {}", self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    use trivium::TriviumCore;

    use super::*;

    /// Clonable in-memory sink so tests can inspect what was written.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn take(&self) -> Vec<u8> {
            self.0.borrow().clone()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Deterministic stand-in for the OS entropy source: bytes 1, 2, 3, …
    struct FixedRng(u8);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                self.0 = self.0.wrapping_add(1);
                *b = self.0;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for FixedRng {}

    const KEY: [u8; 10] = [7; 10];

    fn source(bytes: &[u8]) -> Source {
        Source::from_reader("test input", Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn round_trip() {
        let plaintext = b"attack at dawn, or possibly shortly after breakfast";
        let key = Key::from(KEY);

        let ciphertext = SharedBuf::default();
        encrypt(
            &key,
            &mut FixedRng(0),
            &mut source(plaintext),
            &mut Sink::from_writer("ct", ciphertext.clone()),
        )
        .unwrap();

        let ct = ciphertext.take();
        assert_eq!(ct.len(), plaintext.len() + IV_SIZE);
        assert_eq!(&ct[..IV_SIZE], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        let recovered = SharedBuf::default();
        decrypt(
            &key,
            &mut source(&ct),
            &mut Sink::from_writer("pt", recovered.clone()),
        )
        .unwrap();
        assert_eq!(recovered.take(), plaintext);
    }

    #[test]
    fn one_byte_file_framing() {
        let key = Key::from(KEY);
        let ciphertext = SharedBuf::default();
        encrypt(
            &key,
            &mut FixedRng(0),
            &mut source(&[0x41]),
            &mut Sink::from_writer("ct", ciphertext.clone()),
        )
        .unwrap();

        let ct = ciphertext.take();
        assert_eq!(ct.len(), 11);

        let iv = Iv::from([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let k0 = TriviumCore::<u64>::new(&key, &iv).next_byte();
        assert_eq!(ct[10], 0x41 ^ k0);
    }

    #[test]
    fn genkey_writes_exactly_one_key() {
        let out = SharedBuf::default();
        genkey(&mut FixedRng(0x20), &mut Sink::from_writer("key", out.clone())).unwrap();
        let written = out.take();
        assert_eq!(written.len(), KEY_SIZE);
        assert_eq!(written[0], 0x21);
    }

    #[test]
    fn short_key_read_is_fatal() {
        let mut key_file = source(&[1, 2, 3]);
        let mut key = Key::default();
        let err = key_file.read_full(&mut key, "key").unwrap_err();
        assert!(
            err.to_string().contains("only read 3 bytes < 10"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn short_iv_read_is_fatal() {
        let key = Key::from(KEY);
        let out = SharedBuf::default();
        let err = decrypt(
            &key,
            &mut source(&[0xAA; 4]),
            &mut Sink::from_writer("pt", out.clone()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("for IV"), "unexpected message: {err}");
    }
}
