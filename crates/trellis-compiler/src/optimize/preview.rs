//! Bounded look-ahead previews.
//!
//! A preview lists, per leading character position, every character a node
//! could match there. Previews may be wider than the truth, never narrower.

use trellis_core::CharacterClass;

use crate::tree::{NodeId, NodeKind};

use super::Optimizer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Preview {
    /// Longest offset at which a following node may start.
    pub(crate) long: usize,
    /// Shortest match length; positions below it are always filled.
    pub(crate) valid: usize,
    pub(crate) classes: Vec<Option<CharacterClass>>,
    /// An assertion stopped the scan; nothing after it may be added.
    pub(crate) blocked: bool,
}

impl Preview {
    pub(crate) fn new(length: usize) -> Self {
        Self {
            long: 0,
            valid: 0,
            classes: vec![None; length],
            blocked: false,
        }
    }

    fn single(length: usize, class: &CharacterClass) -> Self {
        let mut preview = Self::new(length);
        if let Some(slot) = preview.classes.first_mut() {
            *slot = Some(class.clone());
        }
        preview.long = 1.min(length);
        preview.valid = 1.min(length);
        preview
    }

    fn blocked(length: usize) -> Self {
        Self {
            blocked: true,
            ..Self::new(length)
        }
    }

    pub(crate) fn horizon(&self) -> usize {
        self.classes.len()
    }

    /// Filled positions before the first gap.
    fn filled(&self) -> usize {
        self.classes
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.classes.len())
    }

    /// Union `src` into every offset in `first..=last`.
    pub(crate) fn join(&mut self, src: &Preview, first: usize, last: usize) {
        let horizon = self.horizon();
        let filled = src.filled();
        for start in first..=last.min(horizon) {
            for (i, class) in src.classes[..filled].iter().enumerate() {
                let pos = start + i;
                if pos >= horizon {
                    break;
                }
                let Some(class) = class else { break };
                match &mut self.classes[pos] {
                    Some(dest) => dest.union(class),
                    slot @ None => *slot = Some(class.clone()),
                }
            }
        }
    }

    /// Same preview seen through a shorter horizon.
    pub(crate) fn truncated(&self, length: usize) -> Preview {
        let mut classes = self.classes.clone();
        classes.resize(length, None);
        Preview {
            long: self.long.min(length),
            valid: self.valid.min(length),
            classes,
            blocked: self.blocked,
        }
    }

    fn cap(&mut self) {
        let horizon = self.horizon();
        self.long = self.long.min(horizon);
        self.valid = self.valid.min(horizon);
    }

    /// The sound prefix: positions every match fills, up to the first empty one.
    pub(crate) fn scan(&self) -> Option<Vec<CharacterClass>> {
        if self.valid == 0 {
            return None;
        }
        let out: Vec<CharacterClass> = self.classes[..self.valid.min(self.horizon())]
            .iter()
            .map_while(|class| class.as_ref().filter(|c| !c.is_empty()).cloned())
            .collect();
        if out.is_empty() { None } else { Some(out) }
    }
}

impl<M> Optimizer<'_, M> {
    pub(crate) fn preview(&self, id: NodeId, length: usize) -> Preview {
        if let Some(cached) = self.cache.get(&id) {
            return cached.truncated(length);
        }
        match self.tree.kind(id) {
            NodeKind::CompiledClass { index } => match self.registry.class(self.encoding, *index) {
                Some(class) => Preview::single(length, class),
                None => Preview::blocked(length),
            },
            NodeKind::CharClassLeaf(class) => Preview::single(length, class),
            NodeKind::ClassReference { target } => self.preview(*target, length),
            NodeKind::Alternation { children, .. } => self.alternation(children, length),
            NodeKind::Group {
                children,
                zero_width,
            } => {
                let mut preview = self.sequence(children, length);
                if *zero_width {
                    preview.long = 0;
                    preview.valid = 0;
                    preview.blocked = false;
                }
                preview
            }
            NodeKind::Repeat { body, min, max, .. } => self.repeat(*body, *min, *max, length),
            _ => Preview::blocked(length),
        }
    }

    /// Characters `id` must match first, or `None` when nothing is certain.
    pub(crate) fn scan(&self, id: NodeId, length: usize) -> Option<Vec<CharacterClass>> {
        if length == 0 {
            return None;
        }
        self.preview(id, length).scan()
    }

    fn alternation(&self, children: &[NodeId], length: usize) -> Preview {
        let Some((&first, rest)) = children.split_first() else {
            return Preview::blocked(length);
        };
        let mut preview = self.preview(first, length);
        for &child in rest {
            let branch = self.preview(child, length);
            preview.join(&branch, 0, 0);
            preview.valid = preview.valid.min(branch.valid);
            preview.long = preview.long.max(branch.long);
            preview.blocked |= branch.blocked;
        }
        preview
    }

    fn sequence(&self, children: &[NodeId], length: usize) -> Preview {
        let mut preview = Preview::new(length);
        for &child in children {
            let next = self.preview(child, length);
            preview.join(&next, preview.valid, preview.long);
            preview.valid += next.valid;
            preview.long += next.long;
            preview.cap();
            if next.blocked {
                preview.blocked = true;
                break;
            }
        }
        preview
    }

    fn repeat(&self, body: NodeId, min: u32, max: Option<u32>, length: usize) -> Preview {
        let body = self.preview(body, length);
        let mut preview = Preview::new(length);

        let required = (min as usize).min(length);
        for _ in 0..required {
            preview.join(&body, preview.valid, preview.long);
            preview.valid += body.valid;
            preview.long += body.long;
            preview.cap();
            if body.blocked {
                preview.blocked = true;
                return preview;
            }
        }

        let optional = match max {
            Some(max) => (max.saturating_sub(min) as usize).min(length),
            None => length,
        };
        for _ in 0..optional {
            preview.join(&body, preview.valid, preview.long);
            preview.long += body.long;
            preview.cap();
            if body.blocked {
                preview.blocked = true;
                break;
            }
            if body.long == 0 || preview.long >= length {
                break;
            }
        }
        preview
    }
}
