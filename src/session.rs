//! Viewer session: the one object owning all slideshow state.

use log::{debug, info, warn};

use crate::cli::PlayArgs;
use crate::clock::Scheduler;
use crate::controller::{Frequency, PlaybackController, PlaybackState};
use crate::error::SelectionError;
use crate::glitch::GlitchSettings;
use crate::layout::Grid;
use crate::manifest::Manifest;
use crate::renderer::{self, RenderPlan};
use crate::selection::Toggles;

pub struct Session<S: Scheduler> {
    manifest: Manifest,
    toggles: Toggles,
    grid: Grid,
    controller: PlaybackController<S>,
    glitch: GlitchSettings,
}

impl<S: Scheduler> Session<S> {
    /// Starts playing immediately, with no group selected.
    pub fn new(manifest: Manifest, scheduler: S, frequency: Frequency) -> Self {
        let toggles = Toggles::new(&manifest);
        Self {
            manifest,
            toggles,
            grid: Grid::default(),
            controller: PlaybackController::new(scheduler, frequency),
            glitch: GlitchSettings::default(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn frame_index(&self) -> u64 {
        self.controller.frame_index()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn frequency(&self) -> Frequency {
        self.controller.frequency()
    }

    pub fn glitch(&self) -> &GlitchSettings {
        &self.glitch
    }

    pub fn glitch_mut(&mut self) -> &mut GlitchSettings {
        &mut self.glitch
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.controller.scheduler_mut()
    }

    /// Applies the command-line start state: the `--group` list (or the first
    /// manifest group when none is given), the glitch overlay and `--paused`.
    /// An empty manifest starts with an empty grid.
    pub fn apply_startup(&mut self, args: &PlayArgs) -> Result<(), SelectionError> {
        let initial: Vec<String> = if args.groups.is_empty() {
            self.manifest.group_names().take(1).map(str::to_string).collect()
        } else {
            args.groups.clone()
        };
        self.select(initial.iter().map(String::as_str))?;

        self.glitch = GlitchSettings::new(args.glitch, args.glitch_intensity);
        if args.paused {
            self.pause();
        }
        info!("Starting: {}", self.status_line());
        Ok(())
    }

    pub fn toggle_group(&mut self, group: &str) -> Result<bool, SelectionError> {
        let checked = self.toggles.toggle(group)?;
        self.relayout();
        Ok(checked)
    }

    /// Toggles the `index`-th known group (0-based, manifest order).
    pub fn toggle_group_at(&mut self, index: usize) -> Result<bool, SelectionError> {
        let Some(group) = self.toggles.names().nth(index).map(str::to_string) else {
            return Err(SelectionError::UnknownGroup(format!("#{}", index + 1)));
        };
        self.toggle_group(&group)
    }

    pub fn select<'a>(&mut self, groups: impl IntoIterator<Item = &'a str>) -> Result<(), SelectionError> {
        self.toggles.replace(groups)?;
        self.relayout();
        Ok(())
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.controller.set_frequency(frequency);
    }

    pub fn step_frequency(&mut self, delta: i64) -> Frequency {
        let next = self.controller.frequency().step(delta);
        self.controller.set_frequency(next);
        next
    }

    pub fn toggle_playback(&mut self) -> PlaybackState {
        self.controller.toggle()
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn resume(&mut self) {
        self.controller.resume();
    }

    /// Applies pending clock ticks and repaints at the new frame index.
    pub fn pump(&mut self) -> u32 {
        let ticks = self.controller.pump();
        if ticks > 0 {
            renderer::render(&self.manifest, &mut self.grid, self.controller.frame_index());
            debug!("{} tick(s), frame {}", ticks, self.controller.frame_index());
        }
        ticks
    }

    /// Every image reference of the selected groups, in cell order. Surfaces
    /// that need to load images ahead of playback read this after a
    /// selection change.
    pub fn selected_images(&self) -> Vec<&str> {
        self.grid
            .cells()
            .iter()
            .filter_map(|cell| self.manifest.images(&cell.group))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn render_plan(&self) -> RenderPlan {
        renderer::plan(&self.manifest, self.grid.cells(), self.controller.frame_index())
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} | {} | frame {} | glitch {} ({}%) | {}",
            match self.controller.state() {
                PlaybackState::Playing => "playing",
                PlaybackState::Paused => "paused",
            },
            self.controller.frequency(),
            self.controller.frame_index(),
            if self.glitch.enabled { "on" } else { "off" },
            self.glitch.intensity(),
            self.toggles.selection().join(", "),
        )
    }

    fn relayout(&mut self) {
        let selection = self.toggles.selection();
        if let Err(e) = self.grid.rebuild(&selection) {
            // Toggles cap the selection, so this only trips on a logic error
            warn!("Layout rejected: {}", e);
            return;
        }
        renderer::render(&self.manifest, &mut self.grid, self.controller.frame_index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::clock::IntervalScheduler;
    use crate::layout::GridShape;
    use clap::Parser;
    use std::time::Duration;

    fn session() -> Session<IntervalScheduler> {
        let manifest = Manifest::from_iter([
            ("a", vec!["1.png", "2.png"]),
            ("b", vec!["3.png"]),
            ("c", vec![]),
            ("d", vec!["4.png", "5.png", "6.png"]),
            ("e", vec!["7.png"]),
        ]);
        Session::new(manifest, IntervalScheduler::new(), Frequency::new(10).unwrap())
    }

    fn advance(session: &mut Session<IntervalScheduler>, ms: u64) -> u32 {
        session.scheduler_mut().advance(Duration::from_millis(ms));
        session.pump()
    }

    fn images(session: &Session<IntervalScheduler>) -> Vec<Option<&str>> {
        session.grid().cells().iter().map(|c| c.image.as_deref()).collect()
    }

    #[test]
    fn selection_change_paints_immediately() {
        let mut session = session();
        session.select(["a", "b"]).unwrap();
        assert_eq!(images(&session), vec![Some("1.png"), Some("3.png")]);

        assert_eq!(advance(&mut session, 100), 1);
        assert_eq!(session.frame_index(), 1);
        assert_eq!(images(&session), vec![Some("2.png"), Some("3.png")]);
    }

    #[test]
    fn four_groups_make_two_by_two() {
        let mut session = session();
        for group in ["a", "b", "c", "d"] {
            session.toggle_group(group).unwrap();
        }
        assert_eq!(session.grid().shape(), GridShape { columns: 2, rows: 2 });
        assert_eq!(session.toggle_group("e"), Err(SelectionError::Full));
        assert_eq!(session.grid().cells().len(), 4);
    }

    #[test]
    fn empty_group_cell_has_no_image() {
        let mut session = session();
        session.toggle_group("c").unwrap();
        advance(&mut session, 500);
        assert_eq!(images(&session), vec![None]);
    }

    #[test]
    fn toggling_mid_playback_keeps_shared_frame_index() {
        let mut session = session();
        session.select(["a"]).unwrap();
        for _ in 0..4 {
            advance(&mut session, 100);
        }
        session.toggle_group("d").unwrap();
        assert_eq!(session.frame_index(), 4);
        assert_eq!(images(&session), vec![Some("1.png"), Some("5.png")]);
    }

    #[test]
    fn stalled_loop_shows_every_image_in_turn() {
        let mut session = session();
        session.select(["d"]).unwrap();
        let mut shown = Vec::new();
        for ms in [16, 350, 16, 100, 100] {
            let ticks = advance(&mut session, ms);
            assert!(ticks <= 1);
            if ticks > 0 {
                shown.extend(images(&session).into_iter().flatten().map(str::to_string));
            }
        }
        assert_eq!(shown, vec!["5.png", "6.png", "4.png"]);
        assert_eq!(session.frame_index(), 3);
    }

    fn play_args(extra: &[&str]) -> PlayArgs {
        let cli = Cli::parse_from(["gridshow", "play"].into_iter().chain(extra.iter().copied()));
        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };
        args
    }

    #[test]
    fn startup_selects_first_group_by_default() {
        let mut session = session();
        session.apply_startup(&play_args(&[])).unwrap();
        assert_eq!(session.toggles().selection(), vec!["a"]);
        assert_eq!(images(&session), vec![Some("1.png")]);
        assert_eq!(session.playback_state(), PlaybackState::Playing);
        assert!(!session.glitch().enabled);
    }

    #[test]
    fn startup_uses_given_groups_in_manifest_order() {
        let mut session = session();
        session
            .apply_startup(&play_args(&["-g", "d", "-g", "b", "--glitch", "--glitch-intensity", "70"]))
            .unwrap();
        assert_eq!(session.toggles().selection(), vec!["b", "d"]);
        assert_eq!(session.grid().shape(), GridShape { columns: 2, rows: 1 });
        assert!(session.glitch().enabled);
        assert_eq!(session.glitch().intensity(), 70);
    }

    #[test]
    fn startup_rejects_bad_group_lists() {
        let mut session = session();
        let five = play_args(&["-g", "a", "-g", "b", "-g", "c", "-g", "d", "-g", "e"]);
        assert_eq!(session.apply_startup(&five), Err(SelectionError::Full));
        assert!(session.grid().is_empty());
        assert_eq!(
            session.apply_startup(&play_args(&["-g", "zz"])),
            Err(SelectionError::UnknownGroup("zz".to_string()))
        );
    }

    #[test]
    fn startup_paused_holds_the_first_frame() {
        let mut session = session();
        session.apply_startup(&play_args(&["--paused"])).unwrap();
        assert_eq!(session.playback_state(), PlaybackState::Paused);
        assert_eq!(advance(&mut session, 1000), 0);
        assert_eq!(images(&session), vec![Some("1.png")]);
    }

    #[test]
    fn startup_with_empty_manifest_leaves_grid_empty() {
        let manifest = Manifest::from_iter(Vec::<(&str, Vec<&str>)>::new());
        let mut session = Session::new(manifest, IntervalScheduler::new(), Frequency::default());
        session.apply_startup(&play_args(&[])).unwrap();
        assert!(session.grid().is_empty());
        assert!(session.toggles().selection().is_empty());
    }

    #[test]
    fn selected_images_cover_whole_groups() {
        let mut session = session();
        assert!(session.selected_images().is_empty());
        session.select(["d", "a", "c"]).unwrap();
        assert_eq!(
            session.selected_images(),
            vec!["1.png", "2.png", "4.png", "5.png", "6.png"]
        );
        session.toggle_group("a").unwrap();
        assert_eq!(session.selected_images(), vec!["4.png", "5.png", "6.png"]);
    }

    #[test]
    fn toggle_by_index_uses_manifest_order() {
        let mut session = session();
        assert_eq!(session.toggle_group_at(3), Ok(true));
        assert_eq!(session.toggles().selection(), vec!["d"]);
        assert!(session.toggle_group_at(9).is_err());
    }

    #[test]
    fn frequency_change_gives_ten_ticks_per_second() {
        let mut session = session();
        session.select(["a"]).unwrap();
        session.set_frequency(Frequency::new(2).unwrap());
        advance(&mut session, 300);
        session.set_frequency(Frequency::new(10).unwrap());
        let mut ticks = 0;
        for _ in 0..100 {
            ticks += advance(&mut session, 10);
        }
        assert_eq!(ticks, 10);
    }

    #[test]
    fn paused_session_does_not_advance() {
        let mut session = session();
        session.select(["d"]).unwrap();
        advance(&mut session, 100);
        assert_eq!(session.toggle_playback(), PlaybackState::Paused);
        assert_eq!(advance(&mut session, 5000), 0);
        assert_eq!(session.frame_index(), 1);
        session.resume();
        assert_eq!(advance(&mut session, 100), 1);
        assert_eq!(session.frame_index(), 2);
        assert_eq!(images(&session), vec![Some("6.png")]);
    }

    #[test]
    fn step_frequency_clamps() {
        let mut session = session();
        session.set_frequency(Frequency::new(1).unwrap());
        assert_eq!(session.step_frequency(-1).hz(), 1);
        assert_eq!(session.step_frequency(3).hz(), 4);
    }

    #[test]
    fn status_line_mentions_state_and_selection() {
        let mut session = session();
        session.select(["a", "b"]).unwrap();
        session.pause();
        let line = session.status_line();
        assert!(line.starts_with("paused | 10 Hz | frame 0"));
        assert!(line.ends_with("a, b"));
        assert_eq!(session.render_plan().len(), 2);
    }
}
