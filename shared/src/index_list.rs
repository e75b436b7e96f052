/// Prev/next links for one arena slot. A slot belongs to at most one
/// `IndexList` at a time; `linked` is the membership flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Link {
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

impl Link {
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }
}

/// Doubly-linked list threaded through an arena by index.
///
/// The list only stores its ends; the per-slot links live in a `[Link]` slice
/// owned by whoever owns the arena, so several lists can share one link array
/// as long as each slot is in at most one of them. Every operation is O(1)
/// except iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexList {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl IndexList {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn push_back(&mut self, links: &mut [Link], index: usize) {
        debug_assert!(!links[index].linked, "slot {} is already linked", index);

        links[index] = Link {
            prev: self.tail,
            next: None,
            linked: true,
        };
        match self.tail {
            Some(tail) => links[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    pub fn push_front(&mut self, links: &mut [Link], index: usize) {
        debug_assert!(!links[index].linked, "slot {} is already linked", index);

        links[index] = Link {
            prev: None,
            next: self.head,
            linked: true,
        };
        match self.head {
            Some(head) => links[head].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
        self.len += 1;
    }

    /// Unlinks `index`. The caller must know the slot is a member of this list.
    pub fn remove(&mut self, links: &mut [Link], index: usize) {
        let link = links[index];
        if !link.linked {
            return;
        }

        match link.prev {
            Some(prev) => links[prev].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => links[next].prev = link.prev,
            None => self.tail = link.prev,
        }
        links[index] = Link::default();
        self.len -= 1;
    }

    pub fn pop_front(&mut self, links: &mut [Link]) -> Option<usize> {
        let head = self.head?;
        self.remove(links, head);
        Some(head)
    }

    /// Moves an already-linked member to the back.
    pub fn move_to_back(&mut self, links: &mut [Link], index: usize) {
        if self.tail == Some(index) {
            return;
        }
        self.remove(links, index);
        self.push_back(links, index);
    }

    /// Takes every member out of this list into a new one.
    pub fn detach(&mut self) -> IndexList {
        std::mem::take(self)
    }

    pub fn iter<'a>(&self, links: &'a [Link]) -> IndexListIter<'a> {
        IndexListIter {
            links,
            cursor: self.head,
        }
    }
}

pub struct IndexListIter<'a> {
    links: &'a [Link],
    cursor: Option<usize>,
}

impl<'a> Iterator for IndexListIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.links[current].next;
        Some(current)
    }
}
