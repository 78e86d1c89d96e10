use crate::detection::domain::encoding::Encoding;
use crate::detection::domain::face_observation::FaceObservation;
use crate::shared::constants::REFERENCE_TOLERANCE;

/// Result of comparing one cycle's observations against the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    pub matched_index: Option<usize>,
}

impl MatchOutcome {
    pub const NO_MATCH: MatchOutcome = MatchOutcome {
        matched_index: None,
    };

    pub fn is_match(&self) -> bool {
        self.matched_index.is_some()
    }
}

/// Compares live encodings against the enrolled encoding.
///
/// **First match wins:** observations are checked in the order given and
/// the first whose distance is within tolerance ends the scan. There is no
/// best-match selection among later faces.
#[derive(Clone, Copy, Debug)]
pub struct IdentityMatcher {
    tolerance: f64,
}

impl IdentityMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn matches(&self, enrolled: &Encoding, candidate: &Encoding) -> bool {
        enrolled.distance(candidate) <= self.tolerance
    }

    pub fn evaluate(&self, enrolled: &Encoding, observations: &[FaceObservation]) -> MatchOutcome {
        for (index, observation) in observations.iter().enumerate() {
            if self.matches(enrolled, &observation.encoding) {
                return MatchOutcome {
                    matched_index: Some(index),
                };
            }
        }
        MatchOutcome::NO_MATCH
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::new(REFERENCE_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::face_region::FaceRegion;
    use rstest::rstest;

    /// Encoding at exactly `distance` from the origin along the first axis.
    fn at_distance(distance: f32) -> Encoding {
        Encoding::new(vec![distance, 0.0, 0.0, 0.0])
    }

    fn owner() -> Encoding {
        at_distance(0.0)
    }

    fn observation(distance: f32) -> FaceObservation {
        FaceObservation::new(FaceRegion::new(0, 10, 10, 0), at_distance(distance))
    }

    #[test]
    fn test_zero_observations_never_match() {
        let outcome = IdentityMatcher::default().evaluate(&owner(), &[]);
        assert!(!outcome.is_match());
        assert_eq!(outcome.matched_index, None);
    }

    #[rstest]
    #[case::close(0.1, true)]
    #[case::at_tolerance(0.5, true)]
    #[case::just_outside(0.51, false)]
    #[case::far(0.8, false)]
    fn test_single_observation_against_tolerance(#[case] distance: f32, #[case] expected: bool) {
        let outcome = IdentityMatcher::new(0.5).evaluate(&owner(), &[observation(distance)]);
        assert_eq!(outcome.is_match(), expected);
    }

    #[test]
    fn test_first_match_wins_over_closer_later_match() {
        let observations = vec![observation(0.9), observation(0.4), observation(0.05)];
        let outcome = IdentityMatcher::new(0.5).evaluate(&owner(), &observations);
        assert_eq!(outcome.matched_index, Some(1));
    }

    #[rstest]
    #[case::later_strangers(vec![0.2, 0.9, 0.7])]
    #[case::later_matches(vec![0.2, 0.1, 0.0])]
    #[case::alone(vec![0.2])]
    fn test_match_independent_of_later_observations(#[case] distances: Vec<f32>) {
        let observations: Vec<_> = distances.into_iter().map(observation).collect();
        let outcome = IdentityMatcher::new(0.5).evaluate(&owner(), &observations);
        assert_eq!(outcome.matched_index, Some(0));
    }

    #[test]
    fn test_no_match_when_everyone_is_a_stranger() {
        let observations = vec![observation(0.6), observation(1.2)];
        let outcome = IdentityMatcher::new(0.5).evaluate(&owner(), &observations);
        assert_eq!(outcome, MatchOutcome::NO_MATCH);
    }

    #[test]
    fn test_incompatible_encoding_length_never_matches() {
        let stranger = FaceObservation::new(FaceRegion::new(0, 1, 1, 0), Encoding::new(vec![0.0]));
        let outcome = IdentityMatcher::new(10.0).evaluate(&owner(), &[stranger]);
        assert!(!outcome.is_match());
    }

    #[test]
    fn test_evaluate_is_deterministic_and_leaves_input_untouched() {
        let observations = vec![observation(0.7), observation(0.3)];
        let before = observations.clone();
        let matcher = IdentityMatcher::default();
        let a = matcher.evaluate(&owner(), &observations);
        let b = matcher.evaluate(&owner(), &observations);
        assert_eq!(a, b);
        assert_eq!(observations, before);
    }
}
