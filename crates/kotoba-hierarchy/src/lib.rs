//! SKOS 階層トラバーサル
//!
//! このクレートは階層関係の走査を実装します:
//! - broader / narrower などの到達可能性 (サイクル安全)
//! - 推移的コンパニオン述語への閉包の実体化
//! - コレクションのフラット化 (入れ子・循環・順序付き)

use kotoba_core::model::{Assertion, Iri, Term};
use kotoba_core::vocabulary;
use kotoba_store::store::{FactSource, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// 階層関係の記述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    /// Asserted predicate
    pub direct: Iri,
    /// Transitive companion predicate. Traversal follows it alongside the
    /// direct predicate, and closure facts are written under it.
    pub entailed: Option<Iri>,
    /// Edges are walked in both directions
    pub symmetric: bool,
}

impl RelationSpec {
    /// 推移的コンパニオンを持たない関係
    pub fn direct(direct: Iri) -> Self {
        Self {
            direct,
            entailed: None,
            symmetric: false,
        }
    }

    /// 推移的コンパニオン付きの関係
    pub fn transitive(direct: Iri, entailed: Iri) -> Self {
        Self {
            direct,
            entailed: Some(entailed),
            symmetric: false,
        }
    }

    /// 対称関係 (閉包は direct 自身に書き込む)
    pub fn symmetric(direct: Iri) -> Self {
        Self {
            direct: direct.clone(),
            entailed: Some(direct),
            symmetric: true,
        }
    }
}

/// 階層走査エラー
#[derive(thiserror::Error, Debug)]
pub enum TraversalError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// source から到達可能なノードの集合
///
/// direct と entailed のエッジを幅優先で辿る。各ノードは一度だけ訪問する
/// のでサイクルがあっても停止する。source 自身は結果に含まれない:
/// a→b→a のサイクルでは reachable(a) = {b}。
pub fn reachable<S: FactSource + ?Sized>(
    store: &S,
    source: &Iri,
    relation: &RelationSpec,
) -> Result<HashSet<Iri>, TraversalError> {
    let mut visited: HashSet<Iri> = HashSet::new();
    let mut queue: VecDeque<Iri> = VecDeque::new();
    visited.insert(source.clone());
    queue.push_back(source.clone());

    while let Some(node) = queue.pop_front() {
        for target in neighbors(store, &node, relation)? {
            if visited.insert(target.clone()) {
                queue.push_back(target);
            }
        }
    }

    visited.remove(source);
    Ok(visited)
}

/// target が source から到達可能かどうか (見つかり次第打ち切り)
pub fn is_reachable<S: FactSource + ?Sized>(
    store: &S,
    source: &Iri,
    target: &Iri,
    relation: &RelationSpec,
) -> Result<bool, TraversalError> {
    let mut visited: HashSet<Iri> = HashSet::new();
    let mut queue: VecDeque<Iri> = VecDeque::new();
    visited.insert(source.clone());
    queue.push_back(source.clone());

    while let Some(node) = queue.pop_front() {
        for next in neighbors(store, &node, relation)? {
            if visited.insert(next.clone()) {
                if next == *target {
                    return Ok(true);
                }
                queue.push_back(next);
            }
        }
    }

    Ok(false)
}

/// 閉包を実体化し entailed 述語のアサーションとして返す
///
/// エッジを持つ全ての主語についてその到達可能集合を出力する。
/// 自己参照は除く。entailed が無い関係では空を返す。
pub fn relation_closure<S: FactSource + ?Sized>(
    store: &S,
    relation: &RelationSpec,
) -> Result<Vec<Assertion>, TraversalError> {
    let entailed = match &relation.entailed {
        Some(predicate) => predicate.clone(),
        None => return Ok(Vec::new()),
    };

    // Subjects in first-seen store order
    let mut seen: HashSet<Iri> = HashSet::new();
    let mut subjects: Vec<Iri> = Vec::new();
    for predicate in relation_predicates(relation) {
        for fact in store.matching(None, Some(predicate), None)? {
            if seen.insert(fact.subject.clone()) {
                subjects.push(fact.subject.clone());
            }
            if relation.symmetric {
                if let Term::Resource(object) = fact.object {
                    if seen.insert(object.clone()) {
                        subjects.push(object);
                    }
                }
            }
        }
    }

    let mut closure = Vec::new();
    for subject in &subjects {
        let mut targets: Vec<Iri> = reachable(store, subject, relation)?.into_iter().collect();
        targets.sort();
        for target in targets {
            closure.push(Assertion::resource(
                subject.clone(),
                entailed.clone(),
                target,
            ));
        }
    }
    Ok(closure)
}

/// コレクションをフラットな概念リストに展開
///
/// 入れ子のコレクションは深さ優先で展開する。一度展開したコレクションに
/// 再び到達しても何も加えないので、循環するメンバーシップでも停止する:
/// A=[x,B], B=[y,A] なら flatten(A) = [x,y]、C=[z,C] なら [z]。
pub fn flatten<S: FactSource + ?Sized>(
    store: &S,
    collection: &Iri,
) -> Result<Vec<Iri>, TraversalError> {
    let mut expanded: HashSet<Iri> = HashSet::new();
    let mut members = Vec::new();
    expand_collection(store, collection, &mut expanded, &mut members)?;
    Ok(members)
}

/// ノードがコレクションかどうか
///
/// Collection / OrderedCollection と型付けされているか、member または
/// memberList のエッジを持てばコレクションとみなす。
pub fn is_collection<S: FactSource + ?Sized>(
    store: &S,
    node: &Iri,
) -> Result<bool, TraversalError> {
    let collection = vocabulary::skos_collection();
    let ordered = vocabulary::skos_ordered_collection();
    if store.has_class_member(&collection, node)? || store.has_class_member(&ordered, node)? {
        return Ok(true);
    }

    let member = vocabulary::skos_member();
    if !store.matching(Some(node), Some(&member), None)?.is_empty() {
        return Ok(true);
    }
    let member_list = vocabulary::skos_member_list();
    Ok(!store
        .matching(Some(node), Some(&member_list), None)?
        .is_empty())
}

fn relation_predicates(relation: &RelationSpec) -> Vec<&Iri> {
    let mut predicates = vec![&relation.direct];
    if let Some(entailed) = &relation.entailed {
        if *entailed != relation.direct {
            predicates.push(entailed);
        }
    }
    predicates
}

/// direct / entailed のエッジの先 (対称関係では逆向きも)
fn neighbors<S: FactSource + ?Sized>(
    store: &S,
    node: &Iri,
    relation: &RelationSpec,
) -> Result<Vec<Iri>, TraversalError> {
    let mut out = Vec::new();
    for predicate in relation_predicates(relation) {
        for fact in store.matching(Some(node), Some(predicate), None)? {
            if let Term::Resource(target) = fact.object {
                out.push(target);
            }
        }
        if relation.symmetric {
            let node_term = Term::Resource(node.clone());
            for fact in store.matching(None, Some(predicate), Some(&node_term))? {
                out.push(fact.subject);
            }
        }
    }
    Ok(out)
}

fn expand_collection<S: FactSource + ?Sized>(
    store: &S,
    collection: &Iri,
    expanded: &mut HashSet<Iri>,
    out: &mut Vec<Iri>,
) -> Result<(), TraversalError> {
    if !expanded.insert(collection.clone()) {
        return Ok(());
    }
    for member in direct_members(store, collection)? {
        if is_collection(store, &member)? {
            expand_collection(store, &member, expanded, out)?;
        } else {
            out.push(member);
        }
    }
    Ok(())
}

/// memberList があれば RDF リスト順、なければ member エッジの格納順
fn direct_members<S: FactSource + ?Sized>(
    store: &S,
    collection: &Iri,
) -> Result<Vec<Iri>, TraversalError> {
    let member_list = vocabulary::skos_member_list();
    let heads = store.matching(Some(collection), Some(&member_list), None)?;
    if let Some(head) = heads.into_iter().find_map(|fact| match fact.object {
        Term::Resource(iri) => Some(iri),
        Term::Literal(_) => None,
    }) {
        return walk_member_list(store, head);
    }

    let member = vocabulary::skos_member();
    let members = store
        .matching(Some(collection), Some(&member), None)?
        .into_iter()
        .filter_map(|fact| match fact.object {
            Term::Resource(iri) => Some(iri),
            // Literal members are not concepts
            Term::Literal(_) => None,
        })
        .collect();
    Ok(members)
}

/// rdf:first / rdf:rest / rdf:nil のリスト走査 (リスト自体の循環にも備える)
fn walk_member_list<S: FactSource + ?Sized>(
    store: &S,
    head: Iri,
) -> Result<Vec<Iri>, TraversalError> {
    let first = vocabulary::rdf_first();
    let rest = vocabulary::rdf_rest();
    let mut members = Vec::new();
    let mut visited: HashSet<Iri> = HashSet::new();
    let mut node = head;

    while node.as_str() != vocabulary::RDF_NIL {
        if !visited.insert(node.clone()) {
            break;
        }
        for fact in store.matching(Some(&node), Some(&first), None)? {
            if let Term::Resource(member) = fact.object {
                members.push(member);
            }
        }
        let next = store
            .matching(Some(&node), Some(&rest), None)?
            .into_iter()
            .find_map(|fact| match fact.object {
                Term::Resource(iri) => Some(iri),
                Term::Literal(_) => None,
            });
        match next {
            Some(next_node) => node = next_node,
            None => break,
        }
    }
    Ok(members)
}
