//! Strongly connected components (Tarjan).
//!
//! The traversal keeps its own call stack instead of recursing, so a deep
//! dependency chain cannot overflow the thread stack. Index, low-link and
//! on-stack bookkeeping match the recursive formulation exactly, including
//! the order in which components are emitted.

/// One frame of the simulated recursion: the node being visited and the
/// position of the next successor to look at.
struct Frame {
    node: usize,
    next_edge: usize,
}

struct Tarjan<'a> {
    adjacency: &'a [Vec<usize>],
    next_index: usize,
    index: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl<'a> Tarjan<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            next_index: 0,
            index: vec![None; n],
            low_link: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn discover(&mut self, node: usize, frames: &mut Vec<Frame>) {
        self.index[node] = Some(self.next_index);
        self.low_link[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
        frames.push(Frame { node, next_edge: 0 });
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        let mut frames: Vec<Frame> = Vec::new();

        for root in 0..self.adjacency.len() {
            if self.index[root].is_some() {
                continue;
            }
            self.discover(root, &mut frames);

            while let Some(frame) = frames.last_mut() {
                let v = frame.node;

                if let Some(&w) = self.adjacency[v].get(frame.next_edge) {
                    frame.next_edge += 1;
                    match self.index[w] {
                        None => self.discover(w, &mut frames),
                        Some(w_index) if self.on_stack[w] => {
                            self.low_link[v] = self.low_link[v].min(w_index);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                // All successors of `v` handled: "return" from the visit.
                frames.pop();

                if Some(self.low_link[v]) == self.index[v] {
                    let mut component = Vec::new();
                    while let Some(w) = self.stack.pop() {
                        self.on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    self.components.push(component);
                }

                if let Some(parent) = frames.last() {
                    let p = parent.node;
                    self.low_link[p] = self.low_link[p].min(self.low_link[v]);
                }
            }
        }

        self.components
    }
}

/// Every strongly connected component of the graph given as successor lists,
/// singletons included, in the order Tarjan's algorithm completes them.
/// Members are listed in stack-pop order.
pub fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    Tarjan::new(adjacency).run()
}
