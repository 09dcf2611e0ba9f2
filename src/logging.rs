use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, WriteMode};
use log::error;

use crate::aramelo::store::data_dir;

pub fn init() -> LoggerHandle {
    let logger = Logger::try_with_str(
        "warn,aramelo=debug,aramelo_model=debug,pairelo=debug,history=debug",
    )
    .expect("log config text")
    .log_to_file(FileSpec::default().directory(data_dir().join("logs")))
    .write_mode(WriteMode::BufferAndFlush)
    .duplicate_to_stderr(Duplicate::Warn) // keep warnings and errors visible on the console
    .start()
    .expect("log init");

    let orig_hook = std::panic::take_hook();
    let logger_for_panic = logger.clone();
    std::panic::set_hook(Box::new(move |panic_info| {
        // log, flush and invoke the default handler before exiting
        error!("Panic: {panic_info}");
        logger_for_panic.flush();
        orig_hook(panic_info);
        std::process::exit(1);
    }));
    logger
}
