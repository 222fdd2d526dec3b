//! The exercise runner.
//!
//! Walks through the six database exercises in order against one connection.
//! Only a failure to open the database stops the run; every later step
//! reports its own errors on the console and the run moves on.

use crate::config::Config;
use crate::console::Console;
use crate::core::db::{dump_tables, ConnectionManager, ConnectionState, QueryResult};
use crate::core::{HospitalError, Result};
use crate::hospital;
use crate::model::{DoctorId, Experience, HospitalId, Salary, Speciality};
use crate::results_grid::{OutputFormat, ResultsGrid};
use std::path::Path;
use tracing::{info, warn};

const SEPARATOR: &str = "------------------------------------";

/// The interactive steps that follow the connection dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exercise {
    /// Hospital and doctor by ID
    PointLookup,
    /// Doctors by specialty and salary
    SpecialitySearch,
    /// Doctors of one hospital
    HospitalDoctors,
    /// Change a doctor's experience
    UpdateExperience,
}

impl Exercise {
    /// Message shown when the user's input for `field` could not be parsed.
    pub fn invalid_input_message(&self, field: &str) -> &'static str {
        match self {
            Exercise::PointLookup => "Please enter valid integer IDs.",
            Exercise::SpecialitySearch => "Please enter valid format for speciality and salary.",
            Exercise::HospitalDoctors => "Please enter valid format for ID.",
            Exercise::UpdateExperience if field == "experience" => {
                "Please enter a whole number of years for experience."
            }
            Exercise::UpdateExperience => "Please enter valid format for ID.",
        }
    }
}

pub struct ExerciseRunner<'a, C: Console> {
    console: &'a mut C,
    format: OutputFormat,
    strict_experience: bool,
}

impl<'a, C: Console> ExerciseRunner<'a, C> {
    pub fn new(console: &'a mut C, config: &Config) -> Self {
        ExerciseRunner {
            console,
            format: config.output.format,
            strict_experience: config.input.strict_experience,
        }
    }

    /// Runs every exercise against the database at `db_path`.
    ///
    /// Returns the connection state observed after closing, or the open
    /// error (already reported on the console) if the database could not be
    /// used at all.
    pub fn run(&mut self, db_path: &Path) -> Result<ConnectionState> {
        let mut db = match self.connect(db_path) {
            Ok(db) => db,
            Err(e) => {
                warn!("Could not open {:?}: {}", db_path, e);
                self.say(&format!("Error occurred: {}", e))?;
                return Err(e);
            }
        };

        self.fetch_hospital_and_doctor(&db)?;
        self.doctors_by_speciality_and_salary(&db)?;
        self.doctors_by_hospital(&db)?;
        self.update_doctor_experience(&db)?;
        self.close_and_verify(&mut db)
    }

    /// Opens the database and prints the engine version and every table.
    ///
    /// A failure while dumping counts as a failed connection, the handle is
    /// dropped.
    pub fn connect(&mut self, db_path: &Path) -> Result<ConnectionManager> {
        let db = ConnectionManager::open(db_path)?;
        self.say("Database connected successfully")?;
        self.say(&format!("SQLite version: {}", db.sqlite_version()?))?;

        let dumps = dump_tables(db.connection()?)?;
        self.say("")?;
        self.say("Tables in the database:")?;
        for dump in &dumps {
            self.say("")?;
            self.say(SEPARATOR)?;
            self.say(&format!("Table: {}", dump.name))?;
            self.say(SEPARATOR)?;
            self.print_result(&dump.column_summary())?;
            for fk in &dump.foreign_keys {
                self.say(&format!(
                    "Foreign key: {} -> {}.{}",
                    fk.from_column, fk.referenced_table, fk.to_column
                ))?;
            }
            self.say("")?;
            self.say("Printing the table contents")?;
            self.say("")?;
            self.print_result(&dump.contents)?;
        }
        info!(path = ?db.path(), tables = dumps.len(), "dumped database schema");
        Ok(db)
    }

    /// Prompts for a hospital ID and a doctor ID and prints both rows.
    pub fn fetch_hospital_and_doctor(&mut self, db: &ConnectionManager) -> Result<()> {
        self.step(Exercise::PointLookup, |runner| {
            runner.say("")?;
            let hospital_id = HospitalId::parse(&runner.console.read_line("Enter Hospital ID: ")?)?;
            let doctor_id = DoctorId::parse(&runner.console.read_line("Enter Doctor ID: ")?)?;

            let conn = db.connection()?;
            let hospital_rows = hospital::find_hospital(conn, hospital_id)?;
            let doctor_rows = hospital::find_doctor(conn, doctor_id)?;

            if hospital_rows.is_empty() {
                runner.say(&format!(
                    "No matching records found for Hospital with ID {}.",
                    hospital_id
                ))?;
            } else {
                runner.say("")?;
                runner.say(&format!("Fetching Hospital information for ID: {}", hospital_id))?;
                runner.print_result(&hospital_rows)?;
            }

            if doctor_rows.is_empty() {
                runner.say(&format!(
                    "No matching records found for Doctor with ID {}.",
                    doctor_id
                ))?;
            } else {
                runner.say("")?;
                runner.say(&format!("Fetching Doctor information for ID: {}", doctor_id))?;
                runner.print_result(&doctor_rows)?;
            }
            Ok(())
        })
    }

    /// Prompts for a specialty and a salary and prints the matching doctors.
    pub fn doctors_by_speciality_and_salary(&mut self, db: &ConnectionManager) -> Result<()> {
        self.step(Exercise::SpecialitySearch, |runner| {
            runner.say("")?;
            let speciality = Speciality::new(&runner.console.read_line("Enter Speciality information: ")?);
            let salary = Salary::parse(&runner.console.read_line("Enter Salary information: ")?)?;

            let doctors =
                hospital::doctors_by_speciality_and_salary(db.connection()?, &speciality, salary)?;

            runner.say("")?;
            if doctors.is_empty() {
                runner.say(&format!(
                    "No matching records found for Doctor with speciality `{}` and salary `{}`.",
                    speciality, salary
                ))?;
            } else {
                runner.say(&format!(
                    "Fetching Doctor information for speciality `{}` and salary `{}`",
                    speciality, salary
                ))?;
                runner.say("")?;
                runner.print_result(&doctors)?;
            }
            Ok(())
        })
    }

    /// Prompts for a hospital ID and prints the doctors working there.
    pub fn doctors_by_hospital(&mut self, db: &ConnectionManager) -> Result<()> {
        self.step(Exercise::HospitalDoctors, |runner| {
            runner.say("")?;
            let hospital_id = HospitalId::parse(&runner.console.read_line("Enter Hospital ID: ")?)?;

            let doctors = hospital::doctors_by_hospital(db.connection()?, hospital_id)?;

            runner.say("")?;
            if doctors.is_empty() {
                runner.say(&format!(
                    "No matching records found for Doctor in hospital with id `{}`.",
                    hospital_id
                ))?;
            } else {
                runner.say(&format!(
                    "Fetching Doctor information for hospital with id `{}`",
                    hospital_id
                ))?;
                runner.say("")?;
                runner.print_result(&doctors)?;
            }
            Ok(())
        })
    }

    /// Prompts for a doctor ID and a new experience value and applies it.
    ///
    /// Both answers are read before anything is checked. An unknown doctor is
    /// reported ahead of a malformed experience value.
    pub fn update_doctor_experience(&mut self, db: &ConnectionManager) -> Result<()> {
        let strict = self.strict_experience;
        self.step(Exercise::UpdateExperience, |runner| {
            runner.say("")?;
            let doctor_id = DoctorId::parse(&runner.console.read_line("Enter Doctor ID: ")?)?;
            let raw = runner.console.read_line("Enter new experience (in years): ")?;

            let conn = db.connection()?;
            if hospital::find_doctor(conn, doctor_id)?.is_empty() {
                return runner.say(&format!("No doctor found with ID {}", doctor_id));
            }

            let experience = if strict {
                Experience::parse_strict(&raw)?
            } else {
                let experience = Experience::parse_lenient(&raw);
                if !experience.is_numeric() {
                    warn!("Storing non-numeric experience {:?} for doctor {}", raw, doctor_id);
                }
                experience
            };

            match hospital::update_doctor_experience(conn, doctor_id, &experience)? {
                Some(update) => {
                    runner.say("Before update:")?;
                    runner.print_result(&update.before)?;
                    runner.say("")?;
                    runner.say(&format!("Experience updated for Doctor ID {}", doctor_id))?;
                    if update.after.is_empty() {
                        warn!("doctor {} vanished after the update", doctor_id);
                        runner.say(&format!(
                            "Doctor ID {} is no longer present after the update.",
                            doctor_id
                        ))?;
                    } else {
                        runner.say("After update:")?;
                        runner.print_result(&update.after)?;
                    }
                }
                None => {
                    runner.say(&format!("No doctor found with ID {}", doctor_id))?;
                }
            }
            Ok(())
        })
    }

    /// Closes the connection, then probes it to confirm it is unusable.
    pub fn close_and_verify(&mut self, db: &mut ConnectionManager) -> Result<ConnectionState> {
        if db.is_open() {
            match db.close() {
                Ok(()) => {
                    self.say("")?;
                    self.say("Database connection closed.")?;
                }
                Err(e) => self.say(&format!("Error occurred: {}", e))?,
            }
        }

        let state = db.probe();
        match state {
            ConnectionState::Open => self.say("The connection is still open.")?,
            ConnectionState::Closed => self.say("The connection is closed.")?,
        }
        Ok(state)
    }

    /// Runs one exercise, reporting its failure instead of propagating it.
    ///
    /// Only console write errors escape.
    fn step<F>(&mut self, exercise: Exercise, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        match body(self) {
            Ok(()) => Ok(()),
            Err(HospitalError::InvalidInput { field, value }) => {
                warn!(?exercise, field, "rejected input {:?}", value);
                self.say(exercise.invalid_input_message(field))
            }
            Err(e) => {
                warn!(?exercise, "exercise failed: {}", e);
                self.say(&format!("Error occurred: {}", e))
            }
        }
    }

    fn print_result(&mut self, result: &QueryResult) -> Result<()> {
        let rendered = ResultsGrid::from_query_result(result).render_as(self.format)?;
        self.say(rendered.trim_end_matches('\n'))
    }

    fn say(&mut self, line: &str) -> Result<()> {
        self.console.write_line(line)
    }
}
