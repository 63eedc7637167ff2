use crate::image::netpbm::NetpbmEncoding;
use crate::image::resampler::SampleRounding;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_width_argument(command);
        let command = Self::register_height_argument(command);
        let command = Self::register_rounding_argument(command);
        let command = Self::register_encoding_argument(command);
        Self::register_threads_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_width_argument(command: Command) -> Command {
        command.arg(Self::create_width_argument())
    }

    fn register_height_argument(command: Command) -> Command {
        command.arg(Self::create_height_argument())
    }

    fn register_rounding_argument(command: Command) -> Command {
        command.arg(Self::create_rounding_argument())
    }

    fn register_encoding_argument(command: Command) -> Command {
        command.arg(Self::create_encoding_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to PGM or PPM input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to PGM or PPM output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_width_argument() -> Arg {
        arg!(width: -W --width <WIDTH> "Width of the resampled image")
            .required(true)
            .value_parser(value_parser!(u16).range(1..))
    }

    fn create_height_argument() -> Arg {
        arg!(height: -H --height <HEIGHT> "Height of the resampled image")
            .required(true)
            .value_parser(value_parser!(u16).range(1..))
    }

    fn create_rounding_argument() -> Arg {
        arg!(rounding: -r --rounding <POLICY> "Conversion of interpolated values to samples")
            .default_value("Truncate")
            .value_parser(value_parser!(SampleRounding))
    }

    fn create_encoding_argument() -> Arg {
        arg!(encoding: -e --encoding <ENCODING> "Sample encoding of the output file")
            .default_value("Raw")
            .value_parser(value_parser!(NetpbmEncoding))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(u16).range(1..))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            width: Self::extract_width_argument(matches),
            height: Self::extract_height_argument(matches),
            rounding: Self::extract_rounding_argument(matches),
            encoding: Self::extract_encoding_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_width_argument(matches: &ArgMatches) -> u16 {
        matches
            .get_one::<u16>("width")
            .expect("Required argument width not provided")
            .to_owned()
    }

    fn extract_height_argument(matches: &ArgMatches) -> u16 {
        matches
            .get_one::<u16>("height")
            .expect("Required argument height not provided")
            .to_owned()
    }

    fn extract_rounding_argument(matches: &ArgMatches) -> SampleRounding {
        matches
            .get_one::<SampleRounding>("rounding")
            .expect("Rounding policy must be provided, but was unset.")
            .to_owned()
    }

    fn extract_encoding_argument(matches: &ArgMatches) -> NetpbmEncoding {
        matches
            .get_one::<NetpbmEncoding>("encoding")
            .expect("Output encoding must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<u16>("threads")
            .map(|threads| *threads as usize)
            .expect("Required argument threads not provided")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
