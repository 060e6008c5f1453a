pub mod participant;
pub mod tournament;

pub use participant::ParticipantRepository;
pub use tournament::TournamentRepository;
