use crate::config::FormatSettings;
use crate::definition::{CalendarDefinition, CalendarKind};
use crate::error::{CalendarError, CalendarResult};
use crate::resolver::{CalendarLookup, CalendarResolver};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

/// In-memory owner of a file's calendars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarRegistry {
    settings: FormatSettings,
    calendars: Vec<CalendarDefinition>,
    last_unique_id: i32,
}

impl CalendarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: FormatSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    pub fn set_auto_calendar_unique_id(&mut self, enabled: bool) {
        self.settings.auto_calendar_unique_id = enabled;
    }

    /// Takes ownership of `calendar`, assigning the next unique id when
    /// automatic ids are enabled.
    pub fn add_calendar(&mut self, mut calendar: CalendarDefinition) -> &mut CalendarDefinition {
        if self.settings.auto_calendar_unique_id {
            self.last_unique_id += 1;
            calendar.set_unique_id(self.last_unique_id);
        } else {
            self.last_unique_id = self.last_unique_id.max(calendar.unique_id());
        }
        if let (CalendarKind::Base, Some(name)) = (calendar.kind(), calendar.name()) {
            if self.base_calendar(name).is_some() {
                log::warn!("base calendar '{name}' is already registered; lookups keep the first");
            }
        }
        log::debug!("registered calendar {}", calendar.label());
        self.calendars.push(calendar);
        let index = self.calendars.len() - 1;
        &mut self.calendars[index]
    }

    pub fn add_base_calendar(&mut self, name: impl Into<String>) -> &mut CalendarDefinition {
        self.add_calendar(CalendarDefinition::base(name))
    }

    pub fn add_derived_calendar(
        &mut self,
        base_calendar_name: impl Into<String>,
    ) -> &mut CalendarDefinition {
        self.add_calendar(CalendarDefinition::derived(base_calendar_name))
    }

    /// Registers the "Standard" base calendar.
    pub fn add_default_base_calendar(&mut self) -> CalendarResult<&mut CalendarDefinition> {
        Ok(self.add_calendar(CalendarDefinition::standard()?))
    }

    pub fn calendars(&self) -> &[CalendarDefinition] {
        &self.calendars
    }

    pub fn base_calendar_mut(&mut self, name: &str) -> Option<&mut CalendarDefinition> {
        self.calendars
            .iter_mut()
            .find(|calendar| calendar.is_base_calendar() && calendar.name() == Some(name))
    }

    pub fn calendar_by_unique_id(&self, unique_id: i32) -> Option<&CalendarDefinition> {
        self.calendars
            .iter()
            .find(|calendar| calendar.unique_id() == unique_id)
    }

    pub fn calendar_by_unique_id_mut(&mut self, unique_id: i32) -> Option<&mut CalendarDefinition> {
        self.calendars
            .iter_mut()
            .find(|calendar| calendar.unique_id() == unique_id)
    }

    pub fn resolver(&self, unique_id: i32) -> Option<CalendarResolver<'_, Self>> {
        self.calendar_by_unique_id(unique_id)
            .map(|calendar| CalendarResolver::new(calendar, self))
    }

    /// Checks that every calendar which defers to a base calendar can reach
    /// one, and that no chain of base references loops.
    pub fn validate(&self) -> CalendarResult<()> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.calendars.len())
            .map(|index| graph.add_node(index))
            .collect();

        for (index, calendar) in self.calendars.iter().enumerate() {
            if !calendar.has_default_days() {
                continue;
            }
            let name = calendar.base_lookup_name();
            let target = self
                .calendars
                .iter()
                .position(|candidate| {
                    candidate.is_base_calendar() && candidate.name() == Some(name)
                })
                .ok_or_else(|| CalendarError::BaseCalendarNotFound(name.to_string()))?;
            graph.add_edge(nodes[index], nodes[target], ());
        }

        toposort(&graph, None).map(|_| ()).map_err(|cycle| {
            let chain = self.cycle_chain(&graph, cycle.node_id());
            log::warn!("base calendar cycle: {}", chain.join(" -> "));
            CalendarError::CalendarCycle { chain }
        })
    }

    /// Follows the single outgoing base reference of each node until one repeats.
    fn cycle_chain(&self, graph: &DiGraph<usize, ()>, start: NodeIndex) -> Vec<String> {
        let mut visited = Vec::new();
        let mut current = start;
        while !visited.contains(&current) {
            visited.push(current);
            match graph.neighbors(current).next() {
                Some(next) => current = next,
                None => break,
            }
        }
        let loop_start = visited
            .iter()
            .position(|node| *node == current)
            .unwrap_or_default();
        let mut chain: Vec<String> = visited[loop_start..]
            .iter()
            .map(|node| self.calendars[graph[*node]].label())
            .collect();
        chain.push(self.calendars[graph[current]].label());
        chain
    }
}

impl CalendarLookup for CalendarRegistry {
    fn base_calendar(&self, name: &str) -> Option<&CalendarDefinition> {
        self.calendars.as_slice().base_calendar(name)
    }
}
