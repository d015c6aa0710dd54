//! Drop files onto a headless surface from the command line.
//!
//! Every argument is treated as a dropped path. `--only <prefix>` restricts
//! accepted MIME types (repeatable).
//!
//! Run with: cargo run --example drop_folder -- --only image/ ./photos/*.png notes.txt
//! Set `RUST_LOG=spark_dropzone=debug` to watch the state machine.

use std::rc::Rc;

use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use spark_dropzone::{
    Cleanup, DragEvent, DropPayload, FileIntakeWidget, FsReader, IntakeHost, IntakeProps,
    KeyHandler, KeyListeners, LoadedFile, MimePrefix, PathFile, ReadFailure, ReadMode,
};

struct TerminalHost {
    reader: FsReader,
    keys: KeyListeners,
}

impl IntakeHost for TerminalHost {
    type File = PathFile;
    type Reader = FsReader;

    fn reader(&self) -> &FsReader {
        &self.reader
    }

    fn open_picker(&self) {
        println!("(a file picker would open here)");
    }

    fn attach_keydown(&self, handler: KeyHandler) -> Cleanup {
        self.keys.attach(handler)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut valid_types = Vec::new();
    let mut files = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--only" {
            if let Some(prefix) = args.next() {
                valid_types.push(MimePrefix::new(prefix));
            }
            continue;
        }
        match PathFile::open(&arg) {
            Ok(file) => files.push(file),
            Err(err) => eprintln!("skipping {arg}: {err}"),
        }
    }

    if files.is_empty() {
        eprintln!("usage: drop_folder [--only <mime-prefix>]... <path>...");
        std::process::exit(2);
    }

    let props = IntakeProps {
        valid_types,
        on_drop: Some(Rc::new(|| println!("dropped"))),
        on_error: Some(Rc::new(|failure: &ReadFailure| {
            eprintln!("{failure} ({})", failure.source)
        })),
        handle_rejected_files: Some(Rc::new(|rejected: Vec<PathFile>| {
            for file in rejected {
                println!("rejected  {}", file.path().display());
            }
        })),
        ..IntakeProps::new(
            ReadMode::ArrayBuffer,
            Rc::new(|hovering| println!("hovering: {hovering}")),
            Rc::new(|loaded: Vec<LoadedFile<PathFile>>| {
                for entry in loaded {
                    let bytes = entry.payload.as_bytes().map_or(0, |b| b.len());
                    println!(
                        "accepted  #{} {} ({bytes} bytes)",
                        entry.source_index,
                        entry.file.path().display()
                    );
                }
            }),
            Rc::new(|percent| println!("progress  {percent:5.1}%")),
        )
    };

    let host = TerminalHost {
        reader: FsReader::default(),
        keys: KeyListeners::default(),
    };
    let widget = FileIntakeWidget::mount(host, props);

    widget.drag_enter(&DragEvent::new());
    let mut event = DragEvent::with_payload(DropPayload::Files(files));
    block_on(widget.handle_drop(&mut event));

    widget.unmount();
}
